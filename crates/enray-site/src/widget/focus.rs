//! Keyboard focus containment for dialogs.
//!
//! While a dialog is open, Tab and Shift+Tab cycle through the dialog's
//! focusable elements only, wrapping at both ends. A dialog without focusable
//! elements keeps focus on its container.

use super::input::KeyPress;

/// The reason for a focus move inside a trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusReason {
    /// Tab key.
    Tab,
    /// Shift+Tab.
    Backtab,
}

impl FocusReason {
    pub fn from_key_press(press: KeyPress) -> Self {
        if press.shift {
            FocusReason::Backtab
        } else {
            FocusReason::Tab
        }
    }
}

/// Where focus goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusMove<H> {
    /// Focus this element.
    Element(H),
    /// Focus the dialog container itself.
    Container,
}

/// Compute the next focus target inside a trap.
///
/// `focusables` is the dialog's tab order and `current` the element that has
/// focus now. When `current` is outside the list, Tab enters at the first
/// element and Shift+Tab at the last.
pub fn trap_focus<H: PartialEq + Clone>(
    focusables: &[H],
    current: Option<&H>,
    reason: FocusReason,
) -> FocusMove<H> {
    let Some(last) = focusables.len().checked_sub(1) else {
        return FocusMove::Container;
    };

    let position = current.and_then(|current| focusables.iter().position(|h| h == current));
    let target = match (reason, position) {
        (FocusReason::Tab, Some(pos)) if pos < last => pos + 1,
        (FocusReason::Tab, _) => 0,
        (FocusReason::Backtab, Some(pos)) if pos > 0 => pos - 1,
        (FocusReason::Backtab, _) => last,
    };
    FocusMove::Element(focusables[target].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::input::Key;

    #[test]
    fn test_tab_wraps_forward() {
        let order = ["close", "prev", "next"];
        assert_eq!(
            trap_focus(&order, Some(&"prev"), FocusReason::Tab),
            FocusMove::Element("next")
        );
        assert_eq!(
            trap_focus(&order, Some(&"next"), FocusReason::Tab),
            FocusMove::Element("close")
        );
    }

    #[test]
    fn test_backtab_wraps_backward() {
        let order = ["close", "prev", "next"];
        assert_eq!(
            trap_focus(&order, Some(&"close"), FocusReason::Backtab),
            FocusMove::Element("next")
        );
        assert_eq!(
            trap_focus(&order, Some(&"next"), FocusReason::Backtab),
            FocusMove::Element("prev")
        );
    }

    #[test]
    fn test_entering_from_outside() {
        let order = [1, 2, 3];
        assert_eq!(trap_focus(&order, None, FocusReason::Tab), FocusMove::Element(1));
        assert_eq!(trap_focus(&order, Some(&9), FocusReason::Backtab), FocusMove::Element(3));
    }

    #[test]
    fn test_empty_trap_focuses_container() {
        let order: [u8; 0] = [];
        assert_eq!(trap_focus(&order, None, FocusReason::Tab), FocusMove::Container);
    }

    #[test]
    fn test_reason_from_key_press() {
        assert_eq!(FocusReason::from_key_press(KeyPress::new(Key::Tab)), FocusReason::Tab);
        assert_eq!(
            FocusReason::from_key_press(KeyPress::with_shift(Key::Tab)),
            FocusReason::Backtab
        );
    }
}
