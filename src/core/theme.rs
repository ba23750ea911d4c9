//! Binder visual themes.
//!
//! Pure presentation data. Every field has a default so partially specified
//! themes from older records still deserialize.

use serde::{Deserialize, Serialize};

/// Default cover texture asset.
pub const DEFAULT_COVER_TEXTURE: &str =
    "/assets/generated/binder-cover-beige-texture.dim_2048x2048.png";

/// Default page texture asset.
pub const DEFAULT_PAGE_TEXTURE: &str =
    "/assets/generated/binder-page-light-texture.dim_2048x2048.png";

/// Visual theme of a binder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub cover_color: String,
    pub cover_texture: Option<String>,
    /// Page background colour (CSS colour string).
    pub page_background: String,
    /// Page texture asset.
    pub background_pattern: Option<String>,
    pub border_style: String,
    pub accent_color: String,
    pub text_color: String,
    pub card_frame_style: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            cover_color: "#F4E8D8".to_string(),
            cover_texture: Some(DEFAULT_COVER_TEXTURE.to_string()),
            page_background: "#FFF8F0".to_string(),
            background_pattern: Some(DEFAULT_PAGE_TEXTURE.to_string()),
            border_style: "solid".to_string(),
            accent_color: "#C89B7B".to_string(),
            text_color: "#4A4A4A".to_string(),
            card_frame_style: "solid".to_string(),
        }
    }
}

impl Theme {
    /// Create a theme with a different page background.
    #[must_use]
    pub fn with_page_background(mut self, color: impl Into<String>) -> Self {
        self.page_background = color.into();
        self
    }

    /// Create a theme with a different cover colour.
    #[must_use]
    pub fn with_cover_color(mut self, color: impl Into<String>) -> Self {
        self.cover_color = color.into();
        self
    }

    /// Create a theme with a different accent colour.
    #[must_use]
    pub fn with_accent_color(mut self, color: impl Into<String>) -> Self {
        self.accent_color = color.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = Theme::default();
        assert_eq!(theme.page_background, "#FFF8F0");
        assert_eq!(theme.cover_texture.as_deref(), Some(DEFAULT_COVER_TEXTURE));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let theme: Theme = serde_json::from_str(r##"{"coverColor": "#000000"}"##).unwrap();
        assert_eq!(theme.cover_color, "#000000");
        assert_eq!(theme.page_background, "#FFF8F0");
        assert_eq!(theme.card_frame_style, "solid");
    }
}
