//! Browser binding for the Enray site behavior layer.
//!
//! Built as a `cdylib` with `wasm-bindgen`. On load it installs a console
//! `tracing` subscriber, reads an optional JSON configuration from a
//! `<script id="site-config" type="application/json">` element, and wires
//! every component whose markup is present on the page.

pub mod bind;
pub mod dom;
pub mod logging;
pub mod runtime;

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use enray_site::{Catalog, FormValidator, SiteConfig};
use enray_site_core::logging::{span_names, targets};

use crate::runtime::Runtime;

/// Read `#site-config`, falling back to defaults.
fn load_config() -> SiteConfig {
    let Some(element) = dom::by_id("site-config") else {
        return SiteConfig::default();
    };
    match SiteConfig::from_json_str(&dom::text(&element)) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(target: targets::WEB, %err, "invalid site config, using defaults");
            SiteConfig::default()
        }
    }
}

fn install() -> Result<(), JsValue> {
    let _span = tracing::info_span!(span_names::INSTALL).entered();

    let config = load_config();
    let catalog = Rc::new(Catalog::builtin().map_err(|err| JsValue::from_str(&err.to_string()))?);
    let validator =
        Rc::new(FormValidator::new().map_err(|err| JsValue::from_str(&err.to_string()))?);
    let reduced_motion = dom::prefers_reduced_motion();
    let mut runtime = Runtime::new();

    let chrome = bind::chrome::install(&config.chrome);
    bind::hero::install(&config.hero, reduced_motion, &mut runtime);
    let carousel = bind::carousel::install_capability(
        &config.capability_carousel,
        &config.carousel_drag,
        &mut runtime,
    );
    bind::lightbox::install(&config.lightbox, Rc::clone(&catalog), chrome.clone(), carousel);
    bind::carousel::install_products(&config.product_carousel, &mut runtime);
    bind::marquee::install(&config.marquee, reduced_motion, &mut runtime);
    bind::drag::install_strips(&config.strip_drag, &mut runtime);
    bind::reveal::install(&config.reveal);
    bind::stats::install(&config.stats, &mut runtime);
    bind::faq::install();
    bind::slideshow::install(&config.slideshow, reduced_motion, &mut runtime);
    bind::contact::install(&config.contact, Rc::clone(&validator), &mut runtime);
    bind::quote::install(&config.quote, catalog, validator, chrome, &mut runtime);

    tracing::info!(target: targets::WEB, frame_callbacks = runtime.len(), reduced_motion, "site installed");
    runtime.run();
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init(logging::default_level());

    let Some(document) = dom::document() else {
        return Err(JsValue::from_str("no document"));
    };
    if document.ready_state() == "loading" {
        dom::listen(&document, "DOMContentLoaded", |_: web_sys::Event| {
            if let Err(err) = install() {
                tracing::error!(target: targets::WEB, ?err, "install failed");
            }
        });
        Ok(())
    } else {
        install()
    }
}
