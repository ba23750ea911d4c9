//! Image resolution: turning card blob references into inline data URLs.
//!
//! Exported print pages are detached documents with no access to the blob
//! store, so every image they show is embedded as a `data:` URL. The
//! `ImageResolver` produces those, preferring a locally edited version of a
//! card over its stored blob.
//!
//! ## Key Types
//!
//! - `DataUrl`: validated `data:image/...;base64,` URL
//! - `BlobFetcher`: fetches blob bytes (`HttpBlobFetcher` over HTTP,
//!   `MemoryBlobFetcher` in-process)
//! - `ImageResolver`: edited-cache lookup, fetch, optional downscale, encode
//! - `validate_upload`: upload type/size checks

pub mod data_url;
pub mod fetch;
pub mod resolver;
pub mod scale;
pub mod validation;

pub use data_url::{sniff_mime, DataUrl};
pub use fetch::{BlobFetcher, HttpBlobFetcher, MemoryBlobFetcher};
pub use resolver::ImageResolver;
pub use scale::{downscale_for_export, Quality};
pub use validation::{validate_upload, validate_upload_bytes, ALLOWED_UPLOAD_TYPES};

use thiserror::Error;

/// Errors while fetching or transcoding an image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed image data URL")]
    InvalidDataUrl,

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}
