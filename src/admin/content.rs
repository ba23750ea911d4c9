//! Global content: terms and conditions, page background, master key.

use crate::backend::{AdminContentSettings, BinderBackend};
use crate::core::{Error, ImageRef, ValidationError};

use super::AdminPortal;

impl<B: BinderBackend> AdminPortal<B> {
    /// Current content settings.
    pub async fn content_settings(&mut self) -> Result<AdminContentSettings, Error> {
        self.gate.require_unlocked()?;
        Ok(self.backend.get_admin_content_settings().await?)
    }

    /// Replace the terms and conditions, keeping the other settings.
    pub async fn update_terms(&mut self, terms: &str) -> Result<(), Error> {
        self.gate.require_unlocked()?;
        let mut settings = self.backend.get_admin_content_settings().await?;
        settings.terms_and_conditions = terms.to_string();
        self.backend.update_admin_content_settings(&settings).await?;
        Ok(())
    }

    /// Set or clear the global page background.
    pub async fn set_background(&mut self, background: Option<ImageRef>) -> Result<(), Error> {
        self.gate.require_unlocked()?;
        let mut settings = self.backend.get_admin_content_settings().await?;
        settings.background = background;
        self.backend.update_admin_content_settings(&settings).await?;
        Ok(())
    }

    /// Change the master admin key. `confirm` must repeat `new_key` exactly.
    pub async fn update_master_key(&mut self, new_key: &str, confirm: &str) -> Result<(), Error> {
        self.gate.require_unlocked()?;
        if new_key.trim().is_empty() {
            return Err(ValidationError::EmptyNewKey.into());
        }
        if new_key != confirm {
            return Err(ValidationError::KeyConfirmationMismatch.into());
        }
        self.backend.update_master_admin_key(new_key.trim()).await?;
        Ok(())
    }
}
