//! Export quality and downscaling.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ImageError;

/// Image quality of an exported page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Large images are downscaled and re-encoded as JPEG.
    #[default]
    Standard,
    /// Original bytes are embedded untouched.
    High,
}

/// Shrink an encoded image so its longest edge is at most `max_edge`.
///
/// Images already within bounds are returned unchanged. Larger ones are
/// resized with Lanczos3, keeping the aspect ratio, and re-encoded as JPEG.
/// Bytes that cannot be decoded are embedded as they are.
pub fn downscale_for_export(bytes: Vec<u8>, max_edge: u32) -> Result<Vec<u8>, ImageError> {
    let img = match image::load_from_memory(&bytes) {
        Ok(img) => img,
        Err(e) => {
            warn!(error = %e, len = bytes.len(), "undecodable image, embedding original bytes");
            return Ok(bytes);
        }
    };
    if img.width().max(img.height()) <= max_edge {
        return Ok(bytes);
    }

    let resized = img.resize(max_edge, max_edge, FilterType::Lanczos3);
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(resized.to_rgb8()).write_to(&mut out, ImageFormat::Jpeg)?;
    Ok(out.into_inner())
}
