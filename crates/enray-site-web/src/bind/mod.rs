//! Page wiring, one module per component.
//!
//! Each `install` looks up its markup, builds the component with its slice of
//! [`SiteConfig`](enray_site::SiteConfig), connects listeners and registers a
//! frame callback when the component has timers. Missing markup is logged at
//! debug level and skipped.

pub mod carousel;
pub mod chrome;
pub mod contact;
pub mod drag;
pub mod faq;
pub mod hero;
pub mod lightbox;
pub mod marquee;
pub mod quote;
pub mod reveal;
pub mod slideshow;
pub mod stats;
