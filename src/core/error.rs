//! Error taxonomy.
//!
//! Every module reports its own error type; `Error` unifies them for callers
//! that drive whole screens. `ErrorKind` tells the caller how to surface a
//! failure:
//!
//! - `Network`: retryable banner with a "Retry" action (includes timeouts)
//! - `Validation`: inline message next to the offending input
//! - `PopupBlocked`: remediation instructions for the print window
//! - `NotFound`: dedicated empty view with a back action
//! - `Rejected`, `Storage`, `Other`: non-fatal toast
//!
//! No error is fatal: every path leaves the caller in a usable state.

use std::time::Duration;

use thiserror::Error;

use crate::backend::{BackendError, SubscriptionStatus};
use crate::export::ExportError;
use crate::images::ImageError;
use crate::store::StoreError;

use super::ids::{BinderId, CardId};

/// Input rejected before it reaches the backend.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please upload a PNG or JPEG image file.")]
    InvalidImageType,

    #[error("Image file is too large. Please upload an image smaller than {}MB.", .max / (1024 * 1024))]
    ImageTooLarge { size: u64, max: u64 },

    #[error("Invalid format. Use format like \"3x3\" or \"4x3\"")]
    InvalidLayout(String),

    #[error("Please enter a preset value")]
    EmptyPreset,

    #[error("Preset \"{0}\" already exists")]
    DuplicatePreset(String),

    #[error("Preset \"{0}\" is not in the preset list")]
    UnknownPreset(String),

    #[error("Please enter a name")]
    EmptyName,

    #[error("Card slot {index} is out of range for {len} cards")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("Please enter the Master Admin Key")]
    EmptyMasterKey,

    #[error("Invalid Master Admin Key. Please try again.")]
    InvalidMasterKey,

    #[error("Too many failed attempts. Try again in {} seconds.", .retry_after.as_secs().max(1))]
    TooManyAttempts { retry_after: Duration },

    #[error("Please unlock the admin portal first.")]
    AdminLocked,

    #[error("Please enter a new Master Admin Key")]
    EmptyNewKey,

    #[error("Keys do not match. Please confirm your new key.")]
    KeyConfirmationMismatch,

    #[error("Both keys are required")]
    StripeKeysRequired,

    #[error("Publishable key must start with \"pk_\"")]
    InvalidPublishableKey,

    #[error("Secret key must start with \"sk_\"")]
    InvalidSecretKey,
}

/// A binder or card missing from the fetched set.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NotFound {
    #[error("Binder not found")]
    Binder(BinderId),
    #[error("Card not found")]
    Card(CardId),
}

/// How a failure should be surfaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Rejected,
    Validation,
    PopupBlocked,
    NotFound,
    Storage,
    Other,
}

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    NotFound(#[from] NotFound),
}

impl Error {
    /// Classify the error for presentation.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Backend(e) => backend_kind(e),
            Error::Validation(_) => ErrorKind::Validation,
            Error::Image(e) => image_kind(e),
            Error::Export(e) => match e {
                ExportError::PopupBlocked => ErrorKind::PopupBlocked,
                ExportError::Image(e) => image_kind(e),
                ExportError::Io(_) => ErrorKind::Storage,
                ExportError::Render(_) => ErrorKind::Other,
            },
            Error::Store(_) => ErrorKind::Storage,
            Error::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Whether offering a "Retry" action makes sense.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    /// Text to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Error::Backend(BackendError::Timeout { .. }) => {
                "The request timed out. Please try again.".to_string()
            }
            Error::Backend(BackendError::Transport(_)) => {
                "Could not reach the server. Please try again.".to_string()
            }
            Error::Backend(BackendError::Unauthorized) => {
                "You are not allowed to do that.".to_string()
            }
            Error::Backend(e) => e.to_string(),
            Error::Image(_) | Error::Export(ExportError::Image(_)) => {
                "Could not load a card image. Please try again.".to_string()
            }
            Error::Export(ExportError::PopupBlocked) => ExportError::PopupBlocked.to_string(),
            Error::Export(_) => "Failed to generate PDF. Please try again.".to_string(),
            Error::Store(_) => "Local storage is unavailable.".to_string(),
            Error::Validation(e) => e.to_string(),
            Error::NotFound(e) => e.to_string(),
        }
    }
}

fn backend_kind(e: &BackendError) -> ErrorKind {
    match e {
        BackendError::Timeout { .. } | BackendError::Transport(_) => ErrorKind::Network,
        BackendError::NotFound(_) => ErrorKind::NotFound,
        BackendError::Rejected(_) | BackendError::Unauthorized => ErrorKind::Rejected,
    }
}

fn image_kind(e: &ImageError) -> ErrorKind {
    match e {
        ImageError::Fetch { .. } | ImageError::Status { .. } => ErrorKind::Network,
        ImageError::InvalidDataUrl | ImageError::Decode(_) => ErrorKind::Other,
    }
}

/// User-facing and debug text for a failed binder creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedError {
    pub user_message: String,
    pub debug_message: String,
}

const BINDER_LIMIT_MARKERS: [&str; 3] = [
    "Binder limit reached",
    "binder limit",
    "Upgrade your subscription to add more binders",
];

/// Turn a binder-creation failure into plan-aware text.
///
/// The backend enforces per-plan binder limits and reports them as plain
/// rejection messages; those are recognised by their wording.
#[must_use]
pub fn normalize_backend_error(
    error: &dyn std::fmt::Display,
    plan: SubscriptionStatus,
) -> NormalizedError {
    let debug_message = error.to_string();

    if BINDER_LIMIT_MARKERS.iter().any(|m| debug_message.contains(m)) {
        let hint = match plan {
            SubscriptionStatus::Free => format!(
                " Upgrade to {} to get up to {} binders, or delete an existing binder to create a new one.",
                SubscriptionStatus::Pro.plan_name(),
                SubscriptionStatus::Pro.max_binders()
            ),
            SubscriptionStatus::Pro => " Delete an existing binder to create a new one.".to_string(),
        };
        return NormalizedError {
            user_message: format!(
                "You've reached the limit of {} binders on the {} plan.{}",
                plan.max_binders(),
                plan.plan_name(),
                hint
            ),
            debug_message,
        };
    }

    NormalizedError {
        user_message: "Failed to create binder. Please try again.".to_string(),
        debug_message,
    }
}
