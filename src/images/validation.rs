//! Card image upload checks.

use image::ImageFormat;

use crate::core::ValidationError;

/// MIME types accepted for card uploads.
pub const ALLOWED_UPLOAD_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

/// Check a declared upload type and size.
///
/// ```
/// use photocard_binder::images::validate_upload;
///
/// assert!(validate_upload("image/png", 1024, 10 * 1024 * 1024).is_ok());
/// assert!(validate_upload("image/gif", 1024, 10 * 1024 * 1024).is_err());
/// ```
pub fn validate_upload(mime: &str, size: u64, max: u64) -> Result<(), ValidationError> {
    if !ALLOWED_UPLOAD_TYPES.contains(&mime) {
        return Err(ValidationError::InvalidImageType);
    }
    if size > max {
        return Err(ValidationError::ImageTooLarge { size, max });
    }
    Ok(())
}

/// Check upload bytes, sniffing their type instead of trusting a label.
///
/// Returns the MIME type of the accepted image.
pub fn validate_upload_bytes(bytes: &[u8], max: u64) -> Result<&'static str, ValidationError> {
    let mime = match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        _ => return Err(ValidationError::InvalidImageType),
    };
    validate_upload(mime, bytes.len() as u64, max)?;
    Ok(mime)
}
