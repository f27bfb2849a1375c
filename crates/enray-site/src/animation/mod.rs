//! Easing and time-driven transitions.
//!
//! Drag momentum and the stat counter interpolate values over a fixed
//! duration; both are expressed as a [`Transition`] polled with the current
//! [`Timestamp`](enray_site_core::Timestamp).

mod easing;
mod transition;

pub use easing::{Easing, ease, lerp_eased};
pub use transition::{Transition, TransitionState};
