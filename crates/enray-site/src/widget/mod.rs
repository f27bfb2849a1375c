//! Behavior components.
//!
//! Every component here is a state machine with no knowledge of the DOM. The
//! page side of each one is a small *surface* trait (for example
//! [`CarouselSurface`]) that the caller passes into the methods that need to
//! read layout or present state. Time is passed in as a
//! [`Timestamp`](enray_site_core::Timestamp), and components that wait own
//! their [`Timer`](enray_site_core::Timer)s and poll them from `tick`.
//!
//! # Components
//!
//! - [`CapabilityCarousel`]: auto-advancing highlighted card, also used for
//!   product carousels
//! - [`MarqueeScroller`]: continuously scrolling product strip
//! - [`DragScroller`]: drag-to-scroll with momentum and click suppression
//! - [`CapabilityModal`]: gallery lightbox with focus trap
//! - [`PageChrome`]: page lock while dialogs are open, scroll-to-top button
//! - [`RevealAnimator`], [`HeroRotator`], [`StatCounter`], [`FaqAccordion`],
//!   [`Slideshow`]
//!
//! Notifications between components go through
//! [`Signal`](enray_site_core::Signal)s, for example a drag pausing the
//! carousel it scrolls.

mod carousel;
mod chrome;
mod drag;
mod faq;
mod focus;
mod hero;
mod input;
mod marquee;
mod modal;
mod reveal;
mod slideshow;
mod stat_counter;

pub use carousel::{
    ArrowMode, ArrowPolicy, ArrowState, CapabilityCarousel, CarouselConfig, CarouselSurface,
    PauseReason, PauseReasons, TrackMetrics, page_scroll_amount,
};
pub use chrome::{ChromeConfig, ChromeSurface, DialogKind, PageChrome};
pub use drag::{DragConfig, DragPhase, DragScroller, DragSurface};
pub use faq::{FaqAccordion, FaqSurface};
pub use focus::{FocusMove, FocusReason, trap_focus};
pub use hero::{BlockState, HeroConfig, HeroRotator, HeroSurface};
pub use input::{Direction, Key, KeyPress};
pub use marquee::{MarqueeConfig, MarqueeLayout, MarqueeScroller, MarqueeSkip, MarqueeSurface};
pub use modal::{
    CapabilityModal, FocusTarget, ImageArea, LayoutMetrics, LightboxConfig, LightboxSurface,
    Trigger, counter_text,
};
pub use reveal::{RevealAnimator, RevealConfig, RevealState, RevealSurface};
pub use slideshow::{Slideshow, SlideshowConfig, SlideshowSurface};
pub use stat_counter::{StatConfig, StatCounter, StatFormat, StatSurface, StatText, Suffix};
