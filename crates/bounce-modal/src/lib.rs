//! Bounce Modal - Exit-intent modal trigger
//!
//! Watches user behavior on a headless document (pointer leaving near the
//! top edge, a meta+L shortcut, the URL fragment, explicit open/close
//! elements) and reveals a hidden set of elements once, remembering the
//! dismissal in a cookie so the prompt does not repeat.
//!
//! The component is fully wired or fully inert: if no marker elements
//! exist, or the dismissal cookie is set and nothing can force a reveal,
//! construction binds zero listeners.

pub mod autorun;
mod markers;
mod modal;
mod options;
pub mod signals;

pub use markers::{ElementRoles, CLOSE_ATTR, HASH_ATTR, OPEN_ATTR, TARGET_ATTR};
pub use modal::ExitIntentModal;
pub use options::{ConfigError, ModalOptions, ModalOverrides};
