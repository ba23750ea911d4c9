//! Stripe key settings.

use tracing::info;

use crate::backend::{BinderBackend, StripeKeys};
use crate::core::{Error, ValidationError};

use super::AdminPortal;

/// Validate a Stripe key pair. Keys are trimmed.
pub fn validate_stripe_keys(publishable: &str, secret: &str) -> Result<StripeKeys, ValidationError> {
    let publishable = publishable.trim();
    let secret = secret.trim();
    if publishable.is_empty() || secret.is_empty() {
        return Err(ValidationError::StripeKeysRequired);
    }
    if !publishable.starts_with("pk_") {
        return Err(ValidationError::InvalidPublishableKey);
    }
    if !secret.starts_with("sk_") {
        return Err(ValidationError::InvalidSecretKey);
    }
    Ok(StripeKeys {
        publishable_key: publishable.to_string(),
        secret_key: secret.to_string(),
    })
}

impl<B: BinderBackend> AdminPortal<B> {
    /// Validate and store the Stripe keys.
    pub async fn save_stripe_keys(&mut self, publishable: &str, secret: &str) -> Result<(), Error> {
        self.gate.require_unlocked()?;
        let keys = validate_stripe_keys(publishable, secret)?;
        self.backend.save_stripe_keys(&keys).await?;
        info!("stripe keys updated");
        Ok(())
    }
}
