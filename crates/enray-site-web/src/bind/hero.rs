//! `#hero-rotator` text blocks.

use wasm_bindgen::JsCast;
use web_sys::{FocusEvent, HtmlElement, MouseEvent, Node};

use enray_site::widget::{BlockState, HeroConfig, HeroRotator, HeroSurface};
use enray_site_core::logging::targets;

use crate::dom;
use crate::runtime::{Runtime, share, with};

struct HeroDom {
    rotator: HtmlElement,
    blocks: Vec<HtmlElement>,
}

impl HeroSurface for HeroDom {
    fn set_block_state(&mut self, index: usize, state: BlockState) {
        let Some(block) = self.blocks.get(index) else {
            return;
        };
        dom::set_class(block, "is-active", state == BlockState::Active);
        dom::set_class(block, "is-leaving", state == BlockState::Leaving);
        dom::set_attr(
            block,
            "aria-hidden",
            if state == BlockState::Active { "false" } else { "true" },
        );
    }

    fn block_height(&self, index: usize) -> f64 {
        self.blocks
            .get(index)
            .map_or(0.0, |block| f64::from(block.scroll_height()))
    }

    fn set_height(&mut self, height: f64) {
        dom::set_style(&self.rotator, "height", &format!("{height}px"));
    }
}

pub fn install(config: &HeroConfig, reduced_motion: bool, runtime: &mut Runtime) {
    let Some(rotator) = dom::by_id("hero-rotator") else {
        tracing::debug!(target: targets::HERO, "no hero rotator");
        return;
    };
    let blocks = dom::find_all(&rotator, ".rot-block");
    let initially_active = blocks.iter().position(|b| dom::has_class(b, "is-active"));
    let Some(widget) = HeroRotator::new(blocks.len(), initially_active, reduced_motion, config.clone())
    else {
        tracing::debug!(target: targets::HERO, blocks = blocks.len(), "too few hero blocks");
        return;
    };

    let hero = share(widget, HeroDom { rotator: rotator.clone(), blocks });
    with(&hero, |hero, page| hero.start(page, dom::now()));

    {
        let hero = hero.clone();
        dom::listen(&rotator, "mouseenter", move |_: MouseEvent| {
            with(&hero, |hero, _| hero.pointer_entered());
        });
    }
    {
        let hero = hero.clone();
        dom::listen(&rotator, "mouseleave", move |_: MouseEvent| {
            with(&hero, |hero, _| hero.pointer_left(dom::now()));
        });
    }
    {
        let hero = hero.clone();
        dom::listen(&rotator, "focusin", move |_: FocusEvent| {
            with(&hero, |hero, _| hero.focus_entered());
        });
    }
    {
        let hero = hero.clone();
        let root = rotator.clone();
        dom::listen(&rotator, "focusout", move |event: FocusEvent| {
            let related = event.related_target().and_then(|t| t.dyn_into::<Node>().ok());
            let still_inside = related.is_some() && dom::contains(&root, related.as_ref());
            with(&hero, |hero, _| hero.focus_left(dom::now(), still_inside));
        });
    }

    runtime.tick_each_frame(&hero, |hero, page, now| hero.tick(page, now));
    tracing::debug!(target: targets::HERO, "hero rotator installed");
}
