//! Keyboard input model.
//!
//! The rendering layer reports key presses as web `KeyboardEvent.key` names
//! ("ArrowRight", "Tab", "a", ...). [`Key::from_web_name`] converts those into
//! the small set of keys the engine reacts to; everything else becomes
//! [`Key::Character`] or [`Key::Unknown`] and is ignored by navigation.
//!
//! ```
//! use nibble_a11y::keyboard::{Key, KeyInput};
//!
//! let input = KeyInput::from_web("Tab", true);
//! assert_eq!(input.key, Key::Tab);
//! assert!(input.modifiers.shift);
//! ```

/// Keys recognized by the interaction engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Navigation
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,

    // Focus and activation
    Tab,
    Enter,
    Space,
    Escape,

    /// A printable character.
    Character(char),

    /// Unknown/unmapped key.
    Unknown,
}

impl Key {
    /// Convert a web `KeyboardEvent.key` value.
    ///
    /// Legacy IE/Edge names ("Left", "Esc", "Spacebar") are accepted too.
    pub fn from_web_name(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Home" => Key::Home,
            "End" => Key::End,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "Tab" => Key::Tab,
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Character(c),
                    _ => Key::Unknown,
                }
            }
        }
    }

    /// Check if this is an arrow key.
    pub fn is_arrow(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight
        )
    }

    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp
                | Key::ArrowDown
                | Key::ArrowLeft
                | Key::ArrowRight
                | Key::Home
                | Key::End
                | Key::PageUp
                | Key::PageDown
        )
    }
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta key is held (Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Check if any modifier other than Shift is held.
    ///
    /// Navigation ignores chorded presses like Ctrl+ArrowRight so that
    /// platform shortcuts keep working.
    pub fn has_command(&self) -> bool {
        self.control || self.alt || self.meta
    }
}

/// A key press delivered to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: KeyboardModifiers,
}

impl KeyInput {
    /// A key press without modifiers.
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: KeyboardModifiers::NONE,
        }
    }

    /// A key press with Shift held.
    pub const fn shifted(key: Key) -> Self {
        Self {
            key,
            modifiers: KeyboardModifiers::SHIFT,
        }
    }

    /// Build from a web key name and the event's `shiftKey` flag.
    pub fn from_web(name: &str, shift: bool) -> Self {
        Self {
            key: Key::from_web_name(name),
            modifiers: KeyboardModifiers {
                shift,
                ..KeyboardModifiers::NONE
            },
        }
    }

    /// Replace the modifiers.
    pub fn with_modifiers(mut self, modifiers: KeyboardModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

/// What the caller should do with a key event after the engine saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The engine acted on the key; the caller must prevent the default
    /// action and stop propagation.
    Handled,
    /// The engine did not act; let the event bubble.
    Ignored,
}

impl KeyOutcome {
    /// Returns true if the caller should prevent the default action.
    #[inline]
    pub fn is_handled(&self) -> bool {
        matches!(self, KeyOutcome::Handled)
    }
}
