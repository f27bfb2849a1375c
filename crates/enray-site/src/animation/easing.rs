//! Easing functions for smooth animations.
//!
//! Easing functions map a linear progress value (0.0 to 1.0) to a transformed
//! value that creates smoother, more natural-looking motion.

/// Available easing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation (no easing).
    #[default]
    Linear,
    /// Quadratic ease-in (starts slow, accelerates).
    EaseIn,
    /// Quadratic ease-out (starts fast, decelerates).
    EaseOut,
    /// Quadratic ease-in-out (smooth start and end).
    EaseInOut,
    /// Cubic ease-out. Used for drag momentum.
    EaseOutCubic,
    /// Cubic ease-in-out.
    EaseInOutCubic,
}

/// Apply an easing function to a progress value.
///
/// # Example
///
/// ```
/// use enray_site::animation::{ease, Easing};
///
/// assert_eq!(ease(Easing::Linear, 0.5), 0.5);
/// assert!(ease(Easing::EaseOutCubic, 0.5) > 0.5);
/// ```
#[inline]
pub fn ease(easing: Easing, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => t,
        Easing::EaseIn => t * t,
        Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        Easing::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
        Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        Easing::EaseInOutCubic => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
            }
        }
    }
}

/// Interpolate between two values using an easing function.
#[inline]
pub fn lerp_eased(easing: Easing, start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * ease(easing, t)
}
