//! One-shot scroll reveal.
//!
//! Observed elements start hidden (transparent and shifted down) and are
//! revealed the first time they intersect the viewport. A revealed element is
//! never hidden again and stops being observed.

use serde::{Deserialize, Serialize};

use enray_site_core::logging::targets;

/// Visibility of one observed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    #[default]
    Hidden,
    Revealed,
}

/// The page side of a [`RevealAnimator`]. Elements are addressed by their
/// registration index.
pub trait RevealSurface {
    /// Apply the hidden starting style.
    fn prepare_hidden(&mut self, index: usize, config: &RevealConfig);
    /// Apply the revealed style.
    fn reveal(&mut self, index: usize);
    /// Stop observing the element.
    fn unobserve(&mut self, index: usize);
}

/// Tuning for reveals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Intersection ratio that triggers a reveal.
    pub threshold: f64,
    /// Initial downward offset of hidden elements, in pixels.
    pub offset: f64,
    /// Length of the opacity and transform transition.
    pub transition_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.15,
            offset: 30.0,
            transition_ms: 600,
        }
    }
}

/// Reveal state for a set of elements.
#[derive(Debug)]
pub struct RevealAnimator {
    config: RevealConfig,
    states: Vec<RevealState>,
}

impl RevealAnimator {
    pub fn new(count: usize, config: RevealConfig) -> Self {
        Self {
            config,
            states: vec![RevealState::Hidden; count],
        }
    }

    #[inline]
    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Set up every element.
    ///
    /// Without intersection observation there is nothing to wait for, so
    /// everything is revealed immediately.
    pub fn attach<S: RevealSurface>(&mut self, surface: &mut S, observer_supported: bool) {
        if !observer_supported {
            tracing::debug!(target: targets::REVEAL, count = self.states.len(), "no observer, revealing all");
            self.reveal_all_immediately(surface);
            return;
        }
        for index in 0..self.states.len() {
            surface.prepare_hidden(index, &self.config);
        }
    }

    /// Reveal every element without waiting for intersection.
    pub fn reveal_all_immediately<S: RevealSurface>(&mut self, surface: &mut S) {
        for (index, state) in self.states.iter_mut().enumerate() {
            if *state == RevealState::Hidden {
                *state = RevealState::Revealed;
                surface.reveal(index);
            }
        }
    }

    /// An intersection report for element `index`.
    ///
    /// Returns `true` if the element was revealed by this report.
    pub fn intersection<S: RevealSurface>(&mut self, surface: &mut S, index: usize, intersecting: bool) -> bool {
        let Some(state) = self.states.get_mut(index) else {
            return false;
        };
        if !intersecting || *state == RevealState::Revealed {
            return false;
        }

        *state = RevealState::Revealed;
        tracing::trace!(target: targets::REVEAL, index, "revealed");
        surface.reveal(index);
        surface.unobserve(index);
        true
    }

    pub fn state(&self, index: usize) -> Option<RevealState> {
        self.states.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Elements {
        hidden: Vec<usize>,
        revealed: Vec<usize>,
        unobserved: Vec<usize>,
    }

    impl RevealSurface for Elements {
        fn prepare_hidden(&mut self, index: usize, _config: &RevealConfig) {
            self.hidden.push(index);
        }
        fn reveal(&mut self, index: usize) {
            self.revealed.push(index);
        }
        fn unobserve(&mut self, index: usize) {
            self.unobserved.push(index);
        }
    }

    #[test]
    fn test_reveal_is_one_shot() {
        let mut page = Elements::default();
        let mut reveal = RevealAnimator::new(2, RevealConfig::default());
        reveal.attach(&mut page, true);
        assert_eq!(page.hidden, vec![0, 1]);

        assert!(reveal.intersection(&mut page, 1, true));
        assert!(!reveal.intersection(&mut page, 1, false));
        assert!(!reveal.intersection(&mut page, 1, true));

        assert_eq!(reveal.state(1), Some(RevealState::Revealed));
        assert_eq!(reveal.state(0), Some(RevealState::Hidden));
        assert_eq!(page.revealed, vec![1]);
        assert_eq!(page.unobserved, vec![1]);
    }

    #[test]
    fn test_without_observer_reveals_everything() {
        let mut page = Elements::default();
        let mut reveal = RevealAnimator::new(3, RevealConfig::default());
        reveal.attach(&mut page, false);
        assert!(page.hidden.is_empty());
        assert_eq!(page.revealed, vec![0, 1, 2]);
        assert!(!reveal.intersection(&mut page, 0, true));
    }

    #[test]
    fn test_unknown_index_is_ignored() {
        let mut page = Elements::default();
        let mut reveal = RevealAnimator::new(1, RevealConfig::default());
        assert!(!reveal.intersection(&mut page, 5, true));
        assert_eq!(reveal.state(5), None);
    }
}
