//! Per-call timeouts.
//!
//! Every call through `TimedBackend` races the configured timeout. When the
//! timeout wins, the inner future is dropped and the call fails with
//! `BackendError::Timeout`; nothing is sent to cancel the request remotely.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::core::{Binder, BinderConfig, BinderId, CardId, GridLayout, Theme, UserId};

use super::{
    AdminContentSettings, BackendError, BinderBackend, NewCard, StripeKeys, SubscriptionStatus,
    UserAnalytics, UserProfile,
};

/// Default timeout of a backend call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A backend whose calls fail with a timeout error instead of hanging.
#[derive(Clone, Debug)]
pub struct TimedBackend<B> {
    inner: B,
    timeout: Duration,
}

impl<B: BinderBackend> TimedBackend<B> {
    /// Wrap `inner` with the default 30 second timeout.
    pub fn new(inner: B) -> Self {
        Self::with_timeout(inner, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(inner: B, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Wrap `inner` with the timeout from `config`.
    pub fn from_config(inner: B, config: &BinderConfig) -> Self {
        Self::with_timeout(inner, config.request_timeout())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn inner(&self) -> &B {
        &self.inner
    }

    async fn call<T, F>(&self, operation: &'static str, fut: F) -> Result<T, BackendError>
    where
        F: Future<Output = Result<T, BackendError>> + Send,
    {
        let started = Instant::now();
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                match &result {
                    Ok(_) => debug!(operation, elapsed_ms, "backend call succeeded"),
                    Err(e) => warn!(operation, elapsed_ms, error = %e, "backend call failed"),
                }
                result
            }
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "backend call timed out"
                );
                Err(BackendError::Timeout {
                    operation,
                    after: self.timeout,
                })
            }
        }
    }
}

#[async_trait]
impl<B: BinderBackend> BinderBackend for TimedBackend<B> {
    async fn get_binders(&self) -> Result<Vec<Binder>, BackendError> {
        self.call("getBinders", self.inner.get_binders()).await
    }

    async fn create_binder(&self, name: &str, theme: &Theme) -> Result<BinderId, BackendError> {
        self.call("createBinder", self.inner.create_binder(name, theme)).await
    }

    async fn delete_binder(&self, binder: &BinderId) -> Result<(), BackendError> {
        self.call("deleteBinder", self.inner.delete_binder(binder)).await
    }

    async fn add_photocard(&self, binder: &BinderId, card: &NewCard) -> Result<CardId, BackendError> {
        self.call("addPhotocard", self.inner.add_photocard(binder, card)).await
    }

    async fn update_photocard(
        &self,
        binder: &BinderId,
        card: &CardId,
        update: &NewCard,
    ) -> Result<(), BackendError> {
        self.call("updatePhotocard", self.inner.update_photocard(binder, card, update))
            .await
    }

    async fn delete_photocard(&self, binder: &BinderId, card: &CardId) -> Result<(), BackendError> {
        self.call("deletePhotocard", self.inner.delete_photocard(binder, card)).await
    }

    async fn update_binder_theme(&self, binder: &BinderId, theme: &Theme) -> Result<(), BackendError> {
        self.call("updateBinderTheme", self.inner.update_binder_theme(binder, theme))
            .await
    }

    async fn reorder_cards(&self, binder: &BinderId, order: &[CardId]) -> Result<(), BackendError> {
        self.call("reorderCards", self.inner.reorder_cards(binder, order)).await
    }

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, BackendError> {
        self.call("getCallerUserProfile", self.inner.get_caller_user_profile())
            .await
    }

    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<(), BackendError> {
        self.call("saveCallerUserProfile", self.inner.save_caller_user_profile(profile))
            .await
    }

    async fn get_subscription_status(&self) -> Result<SubscriptionStatus, BackendError> {
        self.call("getSubscriptionStatus", self.inner.get_subscription_status())
            .await
    }

    async fn update_subscription_status(
        &self,
        user: &UserId,
        status: SubscriptionStatus,
    ) -> Result<(), BackendError> {
        self.call(
            "updateSubscriptionStatus",
            self.inner.update_subscription_status(user, status),
        )
        .await
    }

    async fn get_admin_content_settings(&self) -> Result<AdminContentSettings, BackendError> {
        self.call("getAdminContentSettings", self.inner.get_admin_content_settings())
            .await
    }

    async fn update_admin_content_settings(
        &self,
        settings: &AdminContentSettings,
    ) -> Result<(), BackendError> {
        self.call(
            "updateAdminContentSettings",
            self.inner.update_admin_content_settings(settings),
        )
        .await
    }

    async fn authenticate_master_admin_key(&self, key: &str) -> Result<bool, BackendError> {
        self.call(
            "authenticateMasterAdminKey",
            self.inner.authenticate_master_admin_key(key),
        )
        .await
    }

    async fn update_master_admin_key(&self, new_key: &str) -> Result<(), BackendError> {
        self.call("updateMasterAdminKey", self.inner.update_master_admin_key(new_key))
            .await
    }

    async fn get_all_users(&self) -> Result<Vec<UserAnalytics>, BackendError> {
        self.call("getAllUsers", self.inner.get_all_users()).await
    }

    async fn get_filtered_users(&self, filter: &str) -> Result<Vec<UserAnalytics>, BackendError> {
        self.call("getFilteredUsers", self.inner.get_filtered_users(filter)).await
    }

    async fn get_binders_by_user(&self, user: &UserId) -> Result<Vec<Binder>, BackendError> {
        self.call("getBindersByUser", self.inner.get_binders_by_user(user)).await
    }

    async fn get_layout_presets(&self) -> Result<Vec<GridLayout>, BackendError> {
        self.call("getLayoutPresets", self.inner.get_layout_presets()).await
    }

    async fn add_layout_preset(&self, layout: &GridLayout) -> Result<(), BackendError> {
        self.call("addLayoutPreset", self.inner.add_layout_preset(layout)).await
    }

    async fn remove_layout_preset(&self, layout: &GridLayout) -> Result<(), BackendError> {
        self.call("removeLayoutPreset", self.inner.remove_layout_preset(layout))
            .await
    }

    async fn get_default_layout(&self) -> Result<GridLayout, BackendError> {
        self.call("getDefaultLayout", self.inner.get_default_layout()).await
    }

    async fn set_default_layout(&self, layout: &GridLayout) -> Result<(), BackendError> {
        self.call("setDefaultLayout", self.inner.set_default_layout(layout)).await
    }

    async fn get_user_layout(&self) -> Result<Option<String>, BackendError> {
        self.call("getUserLayout", self.inner.get_user_layout()).await
    }

    async fn update_user_layout(&self, layout: &GridLayout) -> Result<(), BackendError> {
        self.call("updateUserLayout", self.inner.update_user_layout(layout)).await
    }

    async fn save_stripe_keys(&self, keys: &StripeKeys) -> Result<(), BackendError> {
        self.call("saveStripeKeys", self.inner.save_stripe_keys(keys)).await
    }
}
