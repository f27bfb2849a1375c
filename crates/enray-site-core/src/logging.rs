//! Logging facilities for the site layer.
//!
//! Every crate in the workspace instruments itself with the `tracing` crate
//! and tags events with one of the [`targets`] below, so a subscriber can
//! filter per subsystem:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("enray_site::carousel=debug,enray_site_core::timer=off")
//!     .init();
//! ```
//!
//! The browser binding installs its own subscriber that writes to the
//! developer console.

/// Span names used throughout the site layer for tracing.
pub mod span_names {
    /// A single animation frame.
    pub const FRAME: &str = "enray_site::frame";
    /// Page wiring at `DOMContentLoaded`.
    pub const INSTALL: &str = "enray_site::install";
    /// Form submission.
    pub const SUBMIT: &str = "enray_site::submit";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core target.
    pub const CORE: &str = "enray_site_core";
    /// Timer handles.
    pub const TIMER: &str = "enray_site_core::timer";
    /// Signal/slot system.
    pub const SIGNAL: &str = "enray_site_core::signal";
    /// Capability and product carousels.
    pub const CAROUSEL: &str = "enray_site::carousel";
    /// Product marquees.
    pub const MARQUEE: &str = "enray_site::marquee";
    /// Drag-to-scroll and momentum.
    pub const DRAG: &str = "enray_site::drag";
    /// Capability lightbox.
    pub const MODAL: &str = "enray_site::modal";
    /// Contact and quote forms.
    pub const FORM: &str = "enray_site::form";
    /// Scroll reveal.
    pub const REVEAL: &str = "enray_site::reveal";
    /// Hero text rotator.
    pub const HERO: &str = "enray_site::hero";
    /// Stat counter.
    pub const STATS: &str = "enray_site::stats";
    /// FAQ accordion.
    pub const FAQ: &str = "enray_site::faq";
    /// Image slideshow.
    pub const SLIDESHOW: &str = "enray_site::slideshow";
    /// Page-level chrome (modal lock, scroll-to-top).
    pub const CHROME: &str = "enray_site::chrome";
    /// Configuration and gallery data loading.
    pub const DATA: &str = "enray_site::data";
    /// Browser binding.
    pub const WEB: &str = "enray_site_web";
}
