//! Core systems for the Enray site behavior layer.
//!
//! This crate provides the foundation the behavior components are built on:
//!
//! - **Virtual time**: [`Timestamp`], milliseconds since the page's time origin
//! - **Timers**: disposable one-shot and repeating [`Timer`] handles
//! - **Signal/Slot System**: single-threaded notification between components
//! - **Geometry**: viewport-relative [`Rect`] and [`Point`]
//! - **Logging**: `tracing` targets per subsystem
//!
//! # Timer Example
//!
//! ```
//! use enray_site_core::{Timer, Timestamp};
//! use std::time::Duration;
//!
//! let mut advance = Timer::new();
//! advance.start_repeating(Timestamp::ZERO, Duration::from_millis(1600));
//!
//! assert!(!advance.poll(Timestamp::from_millis(1000.0)));
//! assert!(advance.poll(Timestamp::from_millis(1600.0)));
//! ```

pub mod geometry;
pub mod logging;
pub mod signal;
mod time;
mod timer;

pub use geometry::{Point, Rect};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use time::{Timestamp, duration_millis};
pub use timer::{Timer, TimerKind};
