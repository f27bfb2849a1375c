//! Virtual time.
//!
//! Every behavior in the site layer is driven by timestamps handed to it by
//! the host (`performance.now()` or the `requestAnimationFrame` argument in a
//! browser, a hand-rolled clock in tests). Nothing here reads a system clock,
//! which keeps `wasm32-unknown-unknown` builds free of `std::time::Instant`.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::time::Duration;

/// A point in time, in milliseconds since the page's time origin.
///
/// Mirrors the browser's `DOMHighResTimeStamp`: a non-negative `f64` of
/// milliseconds with sub-millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Timestamp(f64);

impl Timestamp {
    /// The time origin.
    pub const ZERO: Self = Self(0.0);

    /// Create a timestamp from milliseconds since the time origin.
    ///
    /// Negative and non-finite inputs are clamped to zero.
    #[inline]
    pub fn from_millis(millis: f64) -> Self {
        if millis.is_finite() && millis > 0.0 {
            Self(millis)
        } else {
            Self(0.0)
        }
    }

    /// Milliseconds since the time origin.
    #[inline]
    pub fn as_millis(self) -> f64 {
        self.0
    }

    /// Time elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn duration_since(self, earlier: Timestamp) -> Duration {
        let delta = self.0 - earlier.0;
        if delta > 0.0 {
            Duration::from_secs_f64(delta / 1000.0)
        } else {
            Duration::ZERO
        }
    }

    /// Milliseconds elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn millis_since(self, earlier: Timestamp) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

/// A duration in (fractional) milliseconds.
///
/// Whole-millisecond durations convert exactly.
#[inline]
pub fn duration_millis(duration: Duration) -> f64 {
    duration.as_secs() as f64 * 1000.0 + f64::from(duration.subsec_nanos()) / 1_000_000.0
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0 + duration_millis(rhs))
    }
}

impl AddAssign<Duration> for Timestamp {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis_clamps() {
        assert_eq!(Timestamp::from_millis(-5.0), Timestamp::ZERO);
        assert_eq!(Timestamp::from_millis(f64::NAN), Timestamp::ZERO);
        assert_eq!(Timestamp::from_millis(12.5).as_millis(), 12.5);
    }

    #[test]
    fn test_duration_since_saturates() {
        let a = Timestamp::from_millis(100.0);
        let b = Timestamp::from_millis(350.0);
        assert_eq!(b.duration_since(a), Duration::from_millis(250));
        assert_eq!(a.duration_since(b), Duration::ZERO);
        assert_eq!(a.millis_since(b), 0.0);
    }

    #[test]
    fn test_add_duration() {
        let mut t = Timestamp::from_millis(1000.0);
        t += Duration::from_millis(600);
        assert!((t.as_millis() - 1600.0).abs() < 1e-9);
    }
}
