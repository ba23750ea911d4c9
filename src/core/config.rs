//! Client configuration.
//!
//! `BinderConfig` collects the tunables of the client core. Every field has a
//! default, so a JSON document only needs the fields it overrides.
//!
//! ```
//! use photocard_binder::core::BinderConfig;
//!
//! let config = BinderConfig::from_json(r#"{"request_timeout_ms": 5000}"#).unwrap();
//! assert_eq!(config.request_timeout().as_secs(), 5);
//! assert_eq!(config.export_slots, 12);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::layout::GridLayout;

/// Client configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Timeout applied to every backend call, in milliseconds.
    pub request_timeout_ms: u64,

    /// Layout used when the user has none (or an unusable one).
    pub default_layout: GridLayout,

    /// Card slots on an exported print page.
    pub export_slots: usize,

    /// Longest image edge, in pixels, embedded by standard-quality exports.
    pub standard_max_edge: u32,

    /// Largest accepted card upload, in bytes.
    pub max_upload_bytes: u64,

    /// Failed master-key attempts before the gate locks out.
    pub key_attempts: u32,

    /// Lockout after too many failed master-key attempts, in seconds.
    pub key_lockout_secs: u64,

    /// Idle time after which an unlocked admin portal locks again, in seconds.
    pub admin_inactivity_secs: u64,

    /// Emails allowed into the admin portal (compared normalized).
    pub superuser_emails: Vec<String>,

    /// Horizontal distance, in pixels, a swipe must travel to turn a page.
    pub swipe_threshold: f32,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            default_layout: GridLayout::DEFAULT,
            export_slots: 12,
            standard_max_edge: 1200,
            max_upload_bytes: 10 * 1024 * 1024,
            key_attempts: 5,
            key_lockout_secs: 60,
            admin_inactivity_secs: 30 * 60,
            superuser_emails: Vec::new(),
            swipe_threshold: 50.0,
        }
    }
}

impl BinderConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Timeout applied to backend calls.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Lockout after too many failed master-key attempts.
    #[must_use]
    pub fn key_lockout(&self) -> Duration {
        Duration::from_secs(self.key_lockout_secs)
    }

    /// Idle time before the admin portal locks again.
    #[must_use]
    pub fn admin_inactivity(&self) -> Duration {
        Duration::from_secs(self.admin_inactivity_secs)
    }

    /// Create a config with a custom request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Create a config with a custom default layout.
    pub fn with_default_layout(mut self, layout: GridLayout) -> Self {
        self.default_layout = layout;
        self
    }

    /// Create a config with a custom standard-quality edge limit.
    pub fn with_standard_max_edge(mut self, edge: u32) -> Self {
        self.standard_max_edge = edge;
        self
    }

    /// Create a config with custom master-key rate limiting.
    pub fn with_key_limits(mut self, attempts: u32, lockout: Duration) -> Self {
        self.key_attempts = attempts;
        self.key_lockout_secs = lockout.as_secs();
        self
    }

    /// Create a config with a superuser allowlist.
    pub fn with_superusers(mut self, emails: Vec<String>) -> Self {
        self.superuser_emails = emails;
        self
    }
}
