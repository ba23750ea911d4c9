//! Inline `data:` URLs.
//!
//! A `DataUrl` is always `data:image/<subtype>;base64,<payload>` with a
//! payload drawn from the standard base64 alphabet. Those characters need no
//! escaping in an HTML attribute, which is what lets the print template embed
//! them verbatim.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ImageError;

/// MIME type used when the bytes are not a recognised image format.
pub const FALLBACK_MIME: &str = "image/jpeg";

fn data_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^data:image/[A-Za-z0-9.+-]+;base64,[A-Za-z0-9+/]*={0,2}$")
            .expect("data URL pattern is valid")
    })
}

/// MIME type of encoded image bytes, sniffed from their magic number.
#[must_use]
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .ok()
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or(FALLBACK_MIME)
}

/// A validated base64 image data URL.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUrl(String);

impl DataUrl {
    /// Encode image bytes, labelling them with their sniffed MIME type.
    #[must_use]
    pub fn encode(bytes: &[u8]) -> Self {
        Self::from_parts(sniff_mime(bytes), bytes)
    }

    /// Encode bytes under an explicit image MIME type.
    ///
    /// A type outside the `image/` family is replaced by `image/jpeg`.
    #[must_use]
    pub fn from_parts(mime: &str, bytes: &[u8]) -> Self {
        let mime_ok = mime
            .strip_prefix("image/")
            .is_some_and(|sub| !sub.is_empty() && sub.bytes().all(is_mime_byte));
        let mime = if mime_ok { mime } else { FALLBACK_MIME };
        Self(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
    }

    /// Validate an existing data URL.
    pub fn parse(url: &str) -> Result<Self, ImageError> {
        if data_url_pattern().is_match(url) {
            Ok(Self(url.to_string()))
        } else {
            Err(ImageError::InvalidDataUrl)
        }
    }

    /// The full URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The declared MIME type, e.g. `image/png`.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        self.0["data:".len()..].split(';').next().unwrap_or_default()
    }

    /// The decoded image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, ImageError> {
        let payload = self.0.split_once(',').map(|(_, p)| p).unwrap_or_default();
        STANDARD.decode(payload).map_err(|_| ImageError::InvalidDataUrl)
    }

    /// Size of the URL in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

fn is_mime_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'+' | b'-')
}

// Image payloads run to megabytes; keep them out of debug output.
impl fmt::Debug for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataUrl")
            .field("mime", &self.mime_type())
            .field("len", &self.0.len())
            .finish()
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DataUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DataUrl {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DataUrl {
    type Error = ImageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if data_url_pattern().is_match(&value) {
            Ok(Self(value))
        } else {
            Err(ImageError::InvalidDataUrl)
        }
    }
}

impl From<DataUrl> for String {
    fn from(url: DataUrl) -> Self {
        url.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_sniffs_png() {
        let url = DataUrl::encode(&PNG_MAGIC);
        assert_eq!(url.mime_type(), "image/png");
        assert!(url.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(url.decode().unwrap(), PNG_MAGIC);
    }

    #[test]
    fn test_unknown_bytes_fall_back_to_jpeg() {
        let url = DataUrl::encode(b"hello");
        assert_eq!(url.mime_type(), "image/jpeg");
        assert_eq!(url.as_str(), "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn test_from_parts_rejects_non_image_mime() {
        let url = DataUrl::from_parts("text/html", b"x");
        assert_eq!(url.mime_type(), "image/jpeg");
        let url = DataUrl::from_parts("image/png\"><script>", b"x");
        assert_eq!(url.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_parse() {
        assert!(DataUrl::parse("data:image/png;base64,AAAA").is_ok());
        assert!(DataUrl::parse("data:image/svg+xml;base64,PHN2Zz4=").is_ok());
        assert!(DataUrl::parse("https://blobs.example/c1").is_err());
        assert!(DataUrl::parse("data:text/html;base64,AAAA").is_err());
        assert!(DataUrl::parse("data:image/png;base64,AA\"AA").is_err());
        assert!(DataUrl::parse("").is_err());
    }

    #[test]
    fn test_debug_hides_payload() {
        let url = DataUrl::encode(&[0u8; 1024]);
        let debug = format!("{url:?}");
        assert!(debug.contains("image/jpeg"));
        assert!(!debug.contains("AAAA"));
    }

    #[test]
    fn test_serde_validates() {
        let url = DataUrl::encode(&PNG_MAGIC);
        let json = serde_json::to_string(&url).unwrap();
        assert_eq!(serde_json::from_str::<DataUrl>(&json).unwrap(), url);
        assert!(serde_json::from_str::<DataUrl>("\"javascript:alert(1)\"").is_err());
    }
}
