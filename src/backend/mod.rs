//! The remote backend contract.
//!
//! The backend is an opaque RPC service. `BinderBackend` lists the calls this
//! crate makes; production code supplies a transport, tests and demos use
//! `MemoryBackend`. Wrap any implementation in `TimedBackend` so no call can
//! hang past the configured timeout.
//!
//! ## Key Types
//!
//! - `BinderBackend`: async RPC surface
//! - `TimedBackend`: per-call timeout and tracing
//! - `MemoryBackend`: in-process reference implementation
//! - `retry_once`: the single retry used by profile queries

pub mod types;
pub mod timeout;
pub mod retry;
pub mod memory;

pub use types::{
    AdminContentSettings, NewCard, StripeKeys, SubscriptionStatus, UserAnalytics, UserProfile,
};
pub use timeout::TimedBackend;
pub use retry::{fetch_caller_profile, retry_once};
pub use memory::MemoryBackend;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::{Binder, BinderId, CardId, GridLayout, Theme, UserId};

/// Failure of a backend call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("transport error: {0}")]
    Transport(String),

    /// The backend refused the request; the message is its own.
    #[error("{0}")]
    Rejected(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,
}

impl BackendError {
    /// Check if the failure is about reaching the backend rather than the
    /// request itself.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, BackendError::Timeout { .. } | BackendError::Transport(_))
    }
}

/// RPC surface of the binder backend.
///
/// Every call acts on behalf of the signed-in caller. Ownership and
/// authorization are enforced by the backend.
#[async_trait]
pub trait BinderBackend: Send + Sync {
    async fn get_binders(&self) -> Result<Vec<Binder>, BackendError>;
    async fn create_binder(&self, name: &str, theme: &Theme) -> Result<BinderId, BackendError>;
    async fn delete_binder(&self, binder: &BinderId) -> Result<(), BackendError>;

    async fn add_photocard(&self, binder: &BinderId, card: &NewCard) -> Result<CardId, BackendError>;
    async fn update_photocard(
        &self,
        binder: &BinderId,
        card: &CardId,
        update: &NewCard,
    ) -> Result<(), BackendError>;
    async fn delete_photocard(&self, binder: &BinderId, card: &CardId) -> Result<(), BackendError>;
    async fn update_binder_theme(&self, binder: &BinderId, theme: &Theme) -> Result<(), BackendError>;

    /// Replace the card order with `order`, which lists every card id once.
    async fn reorder_cards(&self, binder: &BinderId, order: &[CardId]) -> Result<(), BackendError>;

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, BackendError>;
    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<(), BackendError>;
    async fn get_subscription_status(&self) -> Result<SubscriptionStatus, BackendError>;
    async fn update_subscription_status(
        &self,
        user: &UserId,
        status: SubscriptionStatus,
    ) -> Result<(), BackendError>;

    async fn get_admin_content_settings(&self) -> Result<AdminContentSettings, BackendError>;
    async fn update_admin_content_settings(
        &self,
        settings: &AdminContentSettings,
    ) -> Result<(), BackendError>;
    async fn authenticate_master_admin_key(&self, key: &str) -> Result<bool, BackendError>;
    async fn update_master_admin_key(&self, new_key: &str) -> Result<(), BackendError>;

    async fn get_all_users(&self) -> Result<Vec<UserAnalytics>, BackendError>;
    async fn get_filtered_users(&self, filter: &str) -> Result<Vec<UserAnalytics>, BackendError>;
    async fn get_binders_by_user(&self, user: &UserId) -> Result<Vec<Binder>, BackendError>;

    async fn get_layout_presets(&self) -> Result<Vec<GridLayout>, BackendError>;
    async fn add_layout_preset(&self, layout: &GridLayout) -> Result<(), BackendError>;
    async fn remove_layout_preset(&self, layout: &GridLayout) -> Result<(), BackendError>;
    async fn get_default_layout(&self) -> Result<GridLayout, BackendError>;
    async fn set_default_layout(&self, layout: &GridLayout) -> Result<(), BackendError>;

    /// The caller's saved layout token, unvalidated.
    async fn get_user_layout(&self) -> Result<Option<String>, BackendError>;
    async fn update_user_layout(&self, layout: &GridLayout) -> Result<(), BackendError>;

    async fn save_stripe_keys(&self, keys: &StripeKeys) -> Result<(), BackendError>;
}

#[async_trait]
impl<B: BinderBackend + ?Sized> BinderBackend for Arc<B> {
    async fn get_binders(&self) -> Result<Vec<Binder>, BackendError> {
        (**self).get_binders().await
    }

    async fn create_binder(&self, name: &str, theme: &Theme) -> Result<BinderId, BackendError> {
        (**self).create_binder(name, theme).await
    }

    async fn delete_binder(&self, binder: &BinderId) -> Result<(), BackendError> {
        (**self).delete_binder(binder).await
    }

    async fn add_photocard(&self, binder: &BinderId, card: &NewCard) -> Result<CardId, BackendError> {
        (**self).add_photocard(binder, card).await
    }

    async fn update_photocard(
        &self,
        binder: &BinderId,
        card: &CardId,
        update: &NewCard,
    ) -> Result<(), BackendError> {
        (**self).update_photocard(binder, card, update).await
    }

    async fn delete_photocard(&self, binder: &BinderId, card: &CardId) -> Result<(), BackendError> {
        (**self).delete_photocard(binder, card).await
    }

    async fn update_binder_theme(&self, binder: &BinderId, theme: &Theme) -> Result<(), BackendError> {
        (**self).update_binder_theme(binder, theme).await
    }

    async fn reorder_cards(&self, binder: &BinderId, order: &[CardId]) -> Result<(), BackendError> {
        (**self).reorder_cards(binder, order).await
    }

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, BackendError> {
        (**self).get_caller_user_profile().await
    }

    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<(), BackendError> {
        (**self).save_caller_user_profile(profile).await
    }

    async fn get_subscription_status(&self) -> Result<SubscriptionStatus, BackendError> {
        (**self).get_subscription_status().await
    }

    async fn update_subscription_status(
        &self,
        user: &UserId,
        status: SubscriptionStatus,
    ) -> Result<(), BackendError> {
        (**self).update_subscription_status(user, status).await
    }

    async fn get_admin_content_settings(&self) -> Result<AdminContentSettings, BackendError> {
        (**self).get_admin_content_settings().await
    }

    async fn update_admin_content_settings(
        &self,
        settings: &AdminContentSettings,
    ) -> Result<(), BackendError> {
        (**self).update_admin_content_settings(settings).await
    }

    async fn authenticate_master_admin_key(&self, key: &str) -> Result<bool, BackendError> {
        (**self).authenticate_master_admin_key(key).await
    }

    async fn update_master_admin_key(&self, new_key: &str) -> Result<(), BackendError> {
        (**self).update_master_admin_key(new_key).await
    }

    async fn get_all_users(&self) -> Result<Vec<UserAnalytics>, BackendError> {
        (**self).get_all_users().await
    }

    async fn get_filtered_users(&self, filter: &str) -> Result<Vec<UserAnalytics>, BackendError> {
        (**self).get_filtered_users(filter).await
    }

    async fn get_binders_by_user(&self, user: &UserId) -> Result<Vec<Binder>, BackendError> {
        (**self).get_binders_by_user(user).await
    }

    async fn get_layout_presets(&self) -> Result<Vec<GridLayout>, BackendError> {
        (**self).get_layout_presets().await
    }

    async fn add_layout_preset(&self, layout: &GridLayout) -> Result<(), BackendError> {
        (**self).add_layout_preset(layout).await
    }

    async fn remove_layout_preset(&self, layout: &GridLayout) -> Result<(), BackendError> {
        (**self).remove_layout_preset(layout).await
    }

    async fn get_default_layout(&self) -> Result<GridLayout, BackendError> {
        (**self).get_default_layout().await
    }

    async fn set_default_layout(&self, layout: &GridLayout) -> Result<(), BackendError> {
        (**self).set_default_layout(layout).await
    }

    async fn get_user_layout(&self) -> Result<Option<String>, BackendError> {
        (**self).get_user_layout().await
    }

    async fn update_user_layout(&self, layout: &GridLayout) -> Result<(), BackendError> {
        (**self).update_user_layout(layout).await
    }

    async fn save_stripe_keys(&self, keys: &StripeKeys) -> Result<(), BackendError> {
        (**self).save_stripe_keys(keys).await
    }
}
