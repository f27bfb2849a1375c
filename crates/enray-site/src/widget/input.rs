//! Keyboard input shared by the components.

/// Keys the components react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Escape,
    Enter,
    Space,
    ArrowLeft,
    ArrowRight,
    /// Any other key.
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Tab" => Key::Tab,
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => Key::Other,
        }
    }

    /// Whether this key activates a focused control.
    pub fn is_activation(self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

/// A key press with the modifier state the components care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub const fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub const fn with_shift(key: Key) -> Self {
        Self { key, shift: true }
    }
}

impl From<Key> for KeyPress {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

/// Direction of a step through a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Map arrow keys to a direction.
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::ArrowLeft => Some(Direction::Previous),
            Key::ArrowRight => Some(Direction::Next),
            _ => None,
        }
    }

    /// Step `index` by one in this direction, wrapping within `len`.
    ///
    /// Returns `0` when `len` is zero.
    pub fn wrap(self, index: usize, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        match self {
            Direction::Next => (index + 1) % len,
            Direction::Previous => (index % len + len - 1) % len,
        }
    }
}
