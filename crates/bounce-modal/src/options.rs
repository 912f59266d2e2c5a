//! Configuration
//!
//! The options record is merged from defaults and caller overrides at
//! construction and immutable afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Effective modal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalOptions {
    /// Pixel threshold from the top of the viewport for pointer-exit
    /// intent
    pub min_offset: f64,
    /// Debounce before reveal, in milliseconds
    pub delay_ms: u64,
    /// Dismissal cookie name
    pub cookie_name: String,
    /// Dismissal cookie value
    pub cookie_value: String,
    /// Dismissal cookie lifetime in days
    pub cookie_expiry_days: u32,
    /// Class toggled on the document element while the modal is open
    pub open_class: String,
}

/// Caller overrides, shallow-merged over the defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalOverrides {
    pub min_offset: Option<f64>,
    pub delay_ms: Option<u64>,
    pub cookie_name: Option<String>,
    pub cookie_value: Option<String>,
    pub cookie_expiry_days: Option<u32>,
    pub open_class: Option<String>,
}

/// Configuration error, surfaced synchronously at construction
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("min_offset must be a finite, non-negative pixel count (got {0})")]
    InvalidMinOffset(f64),
    #[error("cookie name {0:?} is empty or contains `;`, `=` or whitespace")]
    InvalidCookieName(String),
    #[error("cookie value must not be empty")]
    EmptyCookieValue,
    #[error("cookie expiry must be at least one day")]
    ZeroExpiry,
    #[error("open class {0:?} is empty or contains whitespace")]
    InvalidOpenClass(String),
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            min_offset: 20.0,
            delay_ms: 250,
            cookie_name: "bounce".to_string(),
            cookie_value: "true".to_string(),
            cookie_expiry_days: 30,
            open_class: "bounce-is-open".to_string(),
        }
    }
}

impl ModalOptions {
    /// Defaults with the present override fields applied
    pub fn merged(overrides: ModalOverrides) -> Self {
        let mut options = Self::default();
        if let Some(min_offset) = overrides.min_offset {
            options.min_offset = min_offset;
        }
        if let Some(delay_ms) = overrides.delay_ms {
            options.delay_ms = delay_ms;
        }
        if let Some(cookie_name) = overrides.cookie_name {
            options.cookie_name = cookie_name;
        }
        if let Some(cookie_value) = overrides.cookie_value {
            options.cookie_value = cookie_value;
        }
        if let Some(cookie_expiry_days) = overrides.cookie_expiry_days {
            options.cookie_expiry_days = cookie_expiry_days;
        }
        if let Some(open_class) = overrides.open_class {
            options.open_class = open_class;
        }
        options
    }

    /// Debounce delay as a `Duration`
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_offset.is_finite() || self.min_offset < 0.0 {
            return Err(ConfigError::InvalidMinOffset(self.min_offset));
        }
        let name = &self.cookie_name;
        if name.is_empty() || name.chars().any(|c| c == ';' || c == '=' || c.is_whitespace()) {
            return Err(ConfigError::InvalidCookieName(name.clone()));
        }
        if self.cookie_value.is_empty() {
            return Err(ConfigError::EmptyCookieValue);
        }
        if self.cookie_expiry_days == 0 {
            return Err(ConfigError::ZeroExpiry);
        }
        let class = &self.open_class;
        if class.is_empty() || class.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidOpenClass(class.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ModalOptions::default();
        assert_eq!(options.min_offset, 20.0);
        assert_eq!(options.delay_ms, 250);
        assert_eq!(options.cookie_name, "bounce");
        assert_eq!(options.cookie_value, "true");
        assert_eq!(options.cookie_expiry_days, 30);
        assert_eq!(options.open_class, "bounce-is-open");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn merge_is_shallow() {
        let options = ModalOptions::merged(ModalOverrides {
            min_offset: Some(64.0),
            cookie_name: Some("seen-offer".to_string()),
            ..Default::default()
        });
        assert_eq!(options.min_offset, 64.0);
        assert_eq!(options.cookie_name, "seen-offer");
        assert_eq!(options.delay_ms, 250);
    }

    #[test]
    fn validation_rejects_malformed_values() {
        let mut options = ModalOptions {
            min_offset: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::InvalidMinOffset(_))
        ));

        options.min_offset = 20.0;
        options.cookie_name = "a b".to_string();
        assert!(matches!(
            options.validate(),
            Err(ConfigError::InvalidCookieName(_))
        ));

        options.cookie_name = "bounce".to_string();
        options.cookie_value = String::new();
        assert_eq!(options.validate(), Err(ConfigError::EmptyCookieValue));

        options.cookie_value = "true".to_string();
        options.cookie_expiry_days = 0;
        assert_eq!(options.validate(), Err(ConfigError::ZeroExpiry));

        options.cookie_expiry_days = 30;
        options.open_class = "is open".to_string();
        assert!(matches!(
            options.validate(),
            Err(ConfigError::InvalidOpenClass(_))
        ));
    }

    #[test]
    fn overrides_deserialize_from_partial_json() {
        let overrides: ModalOverrides =
            serde_json::from_str(r#"{"delay_ms": 100}"#).unwrap();
        assert_eq!(overrides.delay_ms, Some(100));
        assert_eq!(overrides.min_offset, None);
    }
}
