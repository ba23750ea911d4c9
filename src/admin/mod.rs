//! Admin portal logic.
//!
//! `AdminPortal` pairs a backend with a `MasterKeyGate`. Every portal
//! operation first requires an unlocked gate (which also counts as activity
//! for the inactivity lock), then validates its input locally, and only then
//! calls the backend.
//!
//! ## Usage
//!
//! ```
//! use photocard_binder::admin::AdminPortal;
//! use photocard_binder::backend::MemoryBackend;
//! use photocard_binder::core::{BinderConfig, GridLayout};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let backend = MemoryBackend::new("admin").with_master_key("k3y");
//! let mut portal = AdminPortal::new(backend, &BinderConfig::default());
//!
//! assert!(portal.add_preset("5x4").await.is_err()); // locked
//!
//! portal.unlock("k3y").await.unwrap();
//! assert_eq!(portal.add_preset(" 5x4 ").await.unwrap(), GridLayout::new(5, 4));
//! # });
//! ```

pub mod ct;
pub mod keygate;
pub mod users;
pub mod presets;
pub mod payments;
pub mod content;

pub use keygate::MasterKeyGate;
pub use users::{emails_match, filter_users, is_superuser_email, normalize_email};
pub use presets::validate_preset;
pub use payments::validate_stripe_keys;

use crate::backend::BinderBackend;
use crate::core::{BinderConfig, Error};

/// The admin portal session.
#[derive(Debug)]
pub struct AdminPortal<B> {
    backend: B,
    gate: MasterKeyGate,
    superusers: Vec<String>,
}

impl<B: BinderBackend> AdminPortal<B> {
    /// Create a locked portal.
    pub fn new(backend: B, config: &BinderConfig) -> Self {
        Self {
            backend,
            gate: MasterKeyGate::from_config(config),
            superusers: config.superuser_emails.clone(),
        }
    }

    /// Check if `email` may open the portal at all.
    #[must_use]
    pub fn is_superuser(&self, email: Option<&str>) -> bool {
        is_superuser_email(email, &self.superusers)
    }

    /// Unlock with the master admin key.
    pub async fn unlock(&mut self, key: &str) -> Result<(), Error> {
        self.gate.unlock(&self.backend, key).await
    }

    pub fn lock(&mut self) {
        self.gate.lock();
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    /// Record user activity.
    pub fn touch(&mut self) {
        self.gate.touch();
    }

    #[must_use]
    pub fn gate(&self) -> &MasterKeyGate {
        &self.gate
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
