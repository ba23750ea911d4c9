//! Master-key gate of the admin portal.
//!
//! The portal stays locked until the master admin key is verified by the
//! backend. Two protections sit in front of that check:
//!
//! - **Rate limiting**: after `max_attempts` consecutive wrong keys, further
//!   attempts are refused locally for `lockout`, without calling the backend.
//! - **Inactivity lock**: an unlocked portal locks again once no activity has
//!   been recorded for `inactivity`.
//!
//! Time is read from `tokio::time::Instant`, so paused-clock tests can step
//! through lockouts.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use crate::backend::BinderBackend;
use crate::core::{BinderConfig, Error, ValidationError};

/// Lock state of the admin portal.
#[derive(Clone, Debug)]
pub struct MasterKeyGate {
    max_attempts: u32,
    lockout: Duration,
    inactivity: Duration,
    failures: u32,
    locked_until: Option<Instant>,
    last_activity: Option<Instant>,
}

impl MasterKeyGate {
    /// Create a locked gate.
    #[must_use]
    pub fn new(max_attempts: u32, lockout: Duration, inactivity: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            lockout,
            inactivity,
            failures: 0,
            locked_until: None,
            last_activity: None,
        }
    }

    /// Create a locked gate with the limits from `config`.
    #[must_use]
    pub fn from_config(config: &BinderConfig) -> Self {
        Self::new(config.key_attempts, config.key_lockout(), config.admin_inactivity())
    }

    /// Check if the portal is unlocked and has not gone idle.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.last_activity
            .is_some_and(|at| at.elapsed() < self.inactivity)
    }

    /// Time left before another attempt is accepted, if locked out.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        let until = self.locked_until?;
        let now = Instant::now();
        (until > now).then(|| until - now)
    }

    /// Consecutive wrong keys since the last success or lockout.
    #[must_use]
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Record user activity, keeping an unlocked portal open.
    pub fn touch(&mut self) {
        if self.is_unlocked() {
            self.last_activity = Some(Instant::now());
        } else if self.last_activity.take().is_some() {
            info!("admin portal locked after inactivity");
        }
    }

    /// Lock the portal.
    pub fn lock(&mut self) {
        self.last_activity = None;
    }

    /// Fail unless the portal is unlocked; counts as activity.
    pub fn require_unlocked(&mut self) -> Result<(), ValidationError> {
        self.touch();
        if self.is_unlocked() {
            Ok(())
        } else {
            Err(ValidationError::AdminLocked)
        }
    }

    /// Verify `key` with the backend and unlock on success.
    ///
    /// The key is trimmed first. A backend failure does not count as a wrong
    /// key.
    pub async fn unlock<B>(&mut self, backend: &B, key: &str) -> Result<(), Error>
    where
        B: BinderBackend + ?Sized,
    {
        let key = key.trim();
        if key.is_empty() {
            return Err(ValidationError::EmptyMasterKey.into());
        }
        if let Some(retry_after) = self.retry_after() {
            return Err(ValidationError::TooManyAttempts { retry_after }.into());
        }

        if backend.authenticate_master_admin_key(key).await? {
            self.failures = 0;
            self.locked_until = None;
            self.last_activity = Some(Instant::now());
            info!("admin portal unlocked");
            return Ok(());
        }

        self.failures += 1;
        if self.failures >= self.max_attempts {
            warn!(
                attempts = self.failures,
                lockout_secs = self.lockout.as_secs(),
                "too many wrong master keys, locking out"
            );
            self.failures = 0;
            self.locked_until = Some(Instant::now() + self.lockout);
        }
        Err(ValidationError::InvalidMasterKey.into())
    }
}

impl Default for MasterKeyGate {
    fn default() -> Self {
        Self::from_config(&BinderConfig::default())
    }
}
