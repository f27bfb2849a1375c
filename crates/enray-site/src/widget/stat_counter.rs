//! Counting statistics.
//!
//! When the stats section first becomes visible, every numeric stat counts up
//! linearly from zero to its target, keeping the `%` or `+` suffix its
//! original text carried.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use enray_site_core::Timestamp;
use enray_site_core::logging::targets;

use crate::animation::{Easing, Transition, TransitionState};

/// Suffix kept from a stat's original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Suffix {
    #[default]
    None,
    Percent,
    Plus,
}

/// A parsed stat: its target value and suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatFormat {
    pub target: u64,
    pub suffix: Suffix,
}

impl StatFormat {
    /// Parse a stat's text. The target is all of its digits read as one
    /// number, so `"1,200+"` counts to 1200.
    ///
    /// Returns `None` for text without digits.
    pub fn parse(text: &str) -> Option<Self> {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        let target = digits.parse().ok()?;
        let suffix = if text.contains('%') {
            Suffix::Percent
        } else if text.contains('+') {
            Suffix::Plus
        } else {
            Suffix::None
        };
        Some(Self { target, suffix })
    }

    /// Text shown for `value`.
    pub fn display(&self, value: u64) -> StatText {
        StatText {
            value,
            suffix: self.suffix,
        }
    }
}

/// Displayable stat value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatText {
    value: u64,
    suffix: Suffix,
}

impl fmt::Display for StatText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suffix {
            Suffix::None => write!(f, "{}", self.value),
            Suffix::Percent => write!(f, "{}%", self.value),
            Suffix::Plus => write!(f, "{}+", self.value),
        }
    }
}

/// The page side of a [`StatCounter`].
pub trait StatSurface {
    fn set_text(&mut self, index: usize, text: &str);
}

/// Tuning for stat counting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatConfig {
    pub duration_ms: u64,
    /// Intersection ratio of the stats section that starts counting.
    pub threshold: f64,
}

impl Default for StatConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            threshold: 0.5,
        }
    }
}

/// Counter for the stats section.
#[derive(Debug)]
pub struct StatCounter {
    // Indexed like the page's stat elements; `None` entries are left alone.
    stats: Vec<Option<StatFormat>>,
    transition: Transition,
    started: bool,
}

impl StatCounter {
    /// Build from each stat element's text and whether it is a label.
    pub fn new<'a, I>(elements: I, config: &StatConfig) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let stats = elements
            .into_iter()
            .map(|(text, is_label)| if is_label { None } else { StatFormat::parse(text) })
            .collect();
        Self {
            stats,
            transition: Transition::new(Easing::Linear, Duration::from_millis(config.duration_ms)),
            started: false,
        }
    }

    pub fn stat(&self, index: usize) -> Option<StatFormat> {
        self.stats.get(index).copied().flatten()
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.transition.is_running()
    }

    /// The section's visibility changed.
    ///
    /// Returns `true` when counting starts; the section no longer needs to be
    /// observed after that.
    pub fn set_in_view(&mut self, now: Timestamp, visible: bool) -> bool {
        if !visible || self.started {
            return false;
        }
        self.started = true;
        tracing::debug!(target: targets::STATS, count = self.stats.iter().flatten().count(), "counting stats");
        self.transition.start(now, 0.0, 1.0);
        true
    }

    pub fn tick<S: StatSurface>(&mut self, surface: &mut S, now: Timestamp) {
        let fraction = match self.transition.update(now) {
            TransitionState::Idle => return,
            TransitionState::Running { value, .. } => value,
            TransitionState::Finished { .. } => 1.0,
        };

        for (index, stat) in self.stats.iter().enumerate() {
            let Some(stat) = stat else {
                continue;
            };
            let value = if fraction >= 1.0 {
                stat.target
            } else {
                (stat.target as f64 * fraction).floor() as u64
            };
            surface.set_text(index, &stat.display(value).to_string());
        }
    }
}
