//! Platform-independent key events and shortcut chords
//!
//! Cmd (meta) and Ctrl are interchangeable as the primary modifier; the
//! platform only changes how shortcuts are labelled.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Cmd on macOS, Ctrl elsewhere; either one counts
    pub fn primary(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.meta || self.alt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn char(ch: char) -> Self {
        Self::new(Key::Char(ch))
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }
}

/// Shortcut convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Mac,
    Other,
}

impl Platform {
    /// Platform of the running binary
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Other
        }
    }

    pub fn modifier_label(self) -> &'static str {
        match self {
            Platform::Mac => "⌘",
            Platform::Other => "Ctrl",
        }
    }
}

/// What a binding listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chord {
    /// Primary modifier + character, no shift
    Primary(char),
    /// Primary modifier + Shift + character
    PrimaryShift(char),
    /// Bare key, no modifiers
    Plain(Key),
    /// Shift + key, no primary modifier
    Shift(Key),
}

impl Chord {
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let modifiers = &event.modifiers;
        if modifiers.alt {
            return false;
        }
        match *self {
            Chord::Primary(expected) => {
                modifiers.primary() && !modifiers.shift && char_matches(event.key, expected)
            }
            Chord::PrimaryShift(expected) => {
                modifiers.primary() && modifiers.shift && char_matches(event.key, expected)
            }
            Chord::Plain(key) => modifiers.is_empty() && event.key == key,
            Chord::Shift(key) => modifiers.shift && !modifiers.primary() && event.key == key,
        }
    }

    /// Human-readable label, e.g. `⌘+Shift+X`
    pub fn label(&self, platform: Platform) -> String {
        let modifier = platform.modifier_label();
        match self {
            Chord::Primary(ch) => format!("{}+{}", modifier, ch.to_ascii_uppercase()),
            Chord::PrimaryShift(ch) => {
                format!("{}+Shift+{}", modifier, ch.to_ascii_uppercase())
            }
            Chord::Plain(key) => key.to_string(),
            Chord::Shift(key) => format!("Shift+{}", key),
        }
    }
}

/// Letters match either case; digits also match their US-layout shifted symbol
fn char_matches(key: Key, expected: char) -> bool {
    let Key::Char(actual) = key else {
        return false;
    };
    if actual.eq_ignore_ascii_case(&expected) {
        return true;
    }
    matches!((expected, actual), ('8', '*') | ('9', '('))
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(ch) => write!(f, "{}", ch),
            Key::Enter => write!(f, "Enter"),
            Key::Tab => write!(f, "Tab"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Escape => write!(f, "Escape"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
        }
    }
}

/// One row of the shortcut reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutHelp {
    pub keys: String,
    pub description: &'static str,
}

/// The keyboard shortcut reference shown to users
pub fn shortcut_help(platform: Platform) -> Vec<ShortcutHelp> {
    [
        (Chord::Primary('b'), "Bold"),
        (Chord::Primary('i'), "Italic"),
        (Chord::Primary('u'), "Underline"),
        (Chord::PrimaryShift('x'), "Strikethrough"),
        (Chord::PrimaryShift('8'), "Bullets"),
        (Chord::Plain(Key::Tab), "Sub-bullets"),
        (Chord::Shift(Key::Tab), "Un-bullet"),
        (Chord::Primary('s'), "Save"),
    ]
    .into_iter()
    .map(|(chord, description)| ShortcutHelp {
        keys: chord.label(platform),
        description,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_and_ctrl_are_equivalent() {
        let save = Chord::Primary('s');
        assert!(save.matches(&KeyEvent::char('s').with_meta()));
        assert!(save.matches(&KeyEvent::char('s').with_ctrl()));
        assert!(save.matches(&KeyEvent::char('S').with_ctrl()));
        assert!(!save.matches(&KeyEvent::char('s')));
        assert!(!save.matches(&KeyEvent::char('s').with_ctrl().with_shift()));
        assert!(!save.matches(&KeyEvent::char('s').with_ctrl().with_alt()));
    }

    #[test]
    fn test_shifted_digits_accept_symbols() {
        let bullets = Chord::PrimaryShift('8');
        assert!(bullets.matches(&KeyEvent::char('8').with_meta().with_shift()));
        assert!(bullets.matches(&KeyEvent::char('*').with_meta().with_shift()));
        assert!(Chord::PrimaryShift('9').matches(&KeyEvent::char('(').with_ctrl().with_shift()));
    }

    #[test]
    fn test_plain_and_shift_keys() {
        assert!(Chord::Plain(Key::Tab).matches(&KeyEvent::new(Key::Tab)));
        assert!(!Chord::Plain(Key::Tab).matches(&KeyEvent::new(Key::Tab).with_shift()));
        assert!(Chord::Shift(Key::Tab).matches(&KeyEvent::new(Key::Tab).with_shift()));
        assert!(!Chord::Shift(Key::Tab).matches(&KeyEvent::new(Key::Tab)));
    }

    #[test]
    fn test_shortcut_help_uses_platform_label() {
        let mac = shortcut_help(Platform::Mac);
        assert_eq!(mac[0].keys, "⌘+B");
        assert_eq!(mac[3].keys, "⌘+Shift+X");
        assert_eq!(mac[6].keys, "Shift+Tab");

        let other = shortcut_help(Platform::Other);
        assert_eq!(other.last().unwrap().keys, "Ctrl+S");
        assert_eq!(other.last().unwrap().description, "Save");
    }
}
