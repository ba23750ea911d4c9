//! The single automatic retry.
//!
//! Profile-type queries get exactly one extra attempt when the first fails
//! to reach the backend. Every other call leaves retrying to the user.

use std::future::Future;

use tracing::warn;

use super::{BackendError, BinderBackend, UserProfile};

/// Run `attempt`, and once more if the first try fails transiently.
pub async fn retry_once<T, F, Fut>(operation: &'static str, mut attempt: F) -> Result<T, BackendError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    match attempt().await {
        Err(e) if e.is_transient() => {
            warn!(operation, error = %e, "retrying once");
            attempt().await
        }
        result => result,
    }
}

/// Fetch the caller's profile, retrying once on network failure.
pub async fn fetch_caller_profile<B>(backend: &B) -> Result<Option<UserProfile>, BackendError>
where
    B: BinderBackend + ?Sized,
{
    retry_once("getCallerUserProfile", move || backend.get_caller_user_profile()).await
}
