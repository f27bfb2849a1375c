//! Behavior components for the Enray marketing site.
//!
//! Each interactive element of the site is modeled as a DOM-free state
//! machine in [`widget`] or [`form`]. The page side of every component is a
//! small surface trait, so the same logic runs against the browser (see the
//! `enray-site-web` crate) and against plain structs in tests.
//!
//! Content comes from the gallery [`Catalog`]; tuning comes from
//! [`SiteConfig`].
//!
//! # Example
//!
//! ```
//! use enray_site::{Catalog, QuoteRequest};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let request = QuoteRequest {
//!     name: "Asha".into(),
//!     email: "asha@example.com".into(),
//!     category: "welding".into(),
//!     category_label: catalog.title_of("welding").unwrap_or("welding").into(),
//!     ..Default::default()
//! };
//! assert!(request.subject().ends_with(" - General"));
//! assert!(request.mailto("sales@enray.co.in").starts_with("mailto:sales@enray.co.in?subject="));
//! ```

pub mod animation;
pub mod config;
pub mod error;
pub mod form;
pub mod gallery;
pub mod widget;

pub use config::SiteConfig;
pub use error::{Error, Result};
pub use form::{
    ContactForm, FieldError, FieldKind, FormValidator, QuoteOutcome, QuoteRequest,
    QuoteRequestForm,
};
pub use gallery::{Catalog, CategoryDetails, GalleryCategory, GalleryImage, GalleryItem};
pub use widget::{
    CapabilityCarousel, CapabilityModal, DragScroller, FaqAccordion, HeroRotator,
    MarqueeScroller, PageChrome, RevealAnimator, Slideshow, StatCounter,
};

/// Re-export of the core crate.
pub use enray_site_core as core;
