//! Site configuration.
//!
//! [`SiteConfig`] gathers the tuning of every component. Every field has a
//! default, so an empty document is a valid configuration and a document only
//! needs to name what it changes.
//!
//! Two component configs have more than one preset: the product carousel and
//! the product-strip drag. Their tables are applied on top of their own preset
//! rather than on top of the type's default.
//!
//! # Example
//!
//! ```
//! use enray_site::config::SiteConfig;
//!
//! let config = SiteConfig::from_toml_str(
//!     r#"
//!     [capability_carousel]
//!     interval_ms = 2000
//!
//!     [product_carousel]
//!     resume_ms = 900
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.capability_carousel.interval_ms, 2000);
//! assert_eq!(config.product_carousel.resume_ms, 900);
//! assert_eq!(config.product_carousel.interval_ms, 1800);
//! ```

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};

use enray_site_core::logging::targets;

use crate::error::{Error, Result};
use crate::form::{ContactConfig, QuoteConfig};
use crate::widget::{
    CarouselConfig, ChromeConfig, DragConfig, HeroConfig, LightboxConfig, MarqueeConfig,
    RevealConfig, SlideshowConfig, StatConfig,
};

/// Configuration of every component on the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub hero: HeroConfig,
    pub capability_carousel: CarouselConfig,
    #[serde(deserialize_with = "product_carousel")]
    pub product_carousel: CarouselConfig,
    pub marquee: MarqueeConfig,
    pub carousel_drag: DragConfig,
    #[serde(deserialize_with = "strip_drag")]
    pub strip_drag: DragConfig,
    pub lightbox: LightboxConfig,
    pub reveal: RevealConfig,
    pub stats: StatConfig,
    pub slideshow: SlideshowConfig,
    pub contact: ContactConfig,
    pub quote: QuoteConfig,
    pub chrome: ChromeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            hero: HeroConfig::default(),
            capability_carousel: CarouselConfig::capability(),
            product_carousel: CarouselConfig::product(),
            marquee: MarqueeConfig::default(),
            carousel_drag: DragConfig::carousel(),
            strip_drag: DragConfig::strip(),
            lightbox: LightboxConfig::default(),
            reveal: RevealConfig::default(),
            stats: StatConfig::default(),
            slideshow: SlideshowConfig::default(),
            contact: ContactConfig::default(),
            quote: QuoteConfig::default(),
            chrome: ChromeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        tracing::debug!(target: targets::CORE, "configuration loaded from TOML");
        Ok(config)
    }

    /// Parse a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source).map_err(Error::ConfigJson)?;
        tracing::debug!(target: targets::CORE, "configuration loaded from JSON");
        Ok(config)
    }

    /// Serialize as JSON, the format embedded in pages.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::ConfigJson)
    }
}

/// Deserialize a table as overrides of `preset`.
fn with_preset<'de, D, T>(deserializer: D, preset: T) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Serialize + DeserializeOwned,
{
    let overrides = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Object(overrides) = overrides else {
        return Err(D::Error::custom("expected a table"));
    };

    let mut merged = serde_json::to_value(preset).map_err(D::Error::custom)?;
    if let serde_json::Value::Object(base) = &mut merged {
        base.extend(overrides);
    }
    serde_json::from_value(merged).map_err(D::Error::custom)
}

fn product_carousel<'de, D>(deserializer: D) -> std::result::Result<CarouselConfig, D::Error>
where
    D: Deserializer<'de>,
{
    with_preset(deserializer, CarouselConfig::product())
}

fn strip_drag<'de, D>(deserializer: D) -> std::result::Result<DragConfig, D::Error>
where
    D: Deserializer<'de>,
{
    with_preset(deserializer, DragConfig::strip())
}
