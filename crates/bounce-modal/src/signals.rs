//! Notification names
//!
//! Events the component emits and consumes on the document element.

/// Emitted when the modal is revealed
pub const SHOW: &str = "bounce:show";
/// Emitted when the modal is hidden
pub const HIDE: &str = "bounce:hide";
/// Consumed: suppress reveals until resumed
pub const PAUSE: &str = "bounce:pause";
/// Consumed: lift a pause
pub const RESUME: &str = "bounce:resume";
/// Consumed: programmatic reveal request
pub const OPEN: &str = "bounce:open";
