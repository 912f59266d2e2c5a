//! Input Events
//!
//! Mouse and keyboard payloads plus the generic named event envelope
//! dispatched through the document.

/// Mouse event
#[derive(Debug, Clone)]
pub struct MouseEvent {
    // Viewport coordinates
    pub client_x: f64,
    pub client_y: f64,

    // Modifiers
    pub shift_key: bool,
    pub ctrl_key: bool,
    pub alt_key: bool,
    pub meta_key: bool,
}

impl MouseEvent {
    /// Create a mouse event at viewport coordinates
    pub fn at(client_x: f64, client_y: f64) -> Self {
        Self {
            client_x,
            client_y,
            shift_key: false,
            ctrl_key: false,
            alt_key: false,
            meta_key: false,
        }
    }
}

/// Key value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Character(char),

    // Navigation
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Editing
    Enter,
    Tab,
    Escape,
    Space,

    Unidentified(String),
}

impl Key {
    /// Parse from a key string
    pub fn parse(s: &str) -> Self {
        match s {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" => Self::Escape,
            " " => Self::Space,
            s if s.chars().count() == 1 => Self::Character(s.chars().next().unwrap()),
            other => Self::Unidentified(other.to_string()),
        }
    }
}

/// Modifier state for a keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyModifiers {
    /// No modifiers held
    pub const NONE: KeyModifiers = KeyModifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Command/meta only
    pub const META: KeyModifiers = KeyModifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: true,
    };
}

/// Keyboard event
#[derive(Debug, Clone)]
pub struct KeyboardEvent {
    pub key: Key,
    pub modifiers: KeyModifiers,
    pub repeat: bool,
}

impl KeyboardEvent {
    /// Create a bare key press
    pub fn key(key: Key) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
            repeat: false,
        }
    }

    /// Create a key press with modifiers
    pub fn shortcut(key: Key, modifiers: KeyModifiers) -> Self {
        Self {
            key,
            modifiers,
            repeat: false,
        }
    }
}

/// Well-known event names
pub mod event_names {
    pub const MOUSE_LEAVE: &str = "mouseleave";
    pub const MOUSE_ENTER: &str = "mouseenter";
    pub const KEY_DOWN: &str = "keydown";
    pub const CLICK: &str = "click";
    pub const HASH_CHANGE: &str = "hashchange";
    pub const CONTENT_LOADED: &str = "DOMContentLoaded";
}

/// Event payload
#[derive(Debug, Clone)]
pub enum EventData {
    None,
    Mouse(MouseEvent),
    Keyboard(KeyboardEvent),
}

/// Named event dispatched through the document
#[derive(Debug, Clone)]
pub struct Event {
    pub name: String,
    pub data: EventData,
}

impl Event {
    /// Create a payload-less event
    pub fn custom(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data: EventData::None,
        }
    }

    /// Create a mouse event
    pub fn mouse(name: &str, event: MouseEvent) -> Self {
        Self {
            name: name.to_string(),
            data: EventData::Mouse(event),
        }
    }

    /// Create a keyboard event
    pub fn keyboard(name: &str, event: KeyboardEvent) -> Self {
        Self {
            name: name.to_string(),
            data: EventData::Keyboard(event),
        }
    }

    /// Mouse payload, if any
    pub fn mouse_payload(&self) -> Option<&MouseEvent> {
        match &self.data {
            EventData::Mouse(event) => Some(event),
            _ => None,
        }
    }

    /// Keyboard payload, if any
    pub fn keyboard_payload(&self) -> Option<&KeyboardEvent> {
        match &self.data {
            EventData::Keyboard(event) => Some(event),
            _ => None,
        }
    }
}
