//! Accent colour preference.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{KeyValueStore, StoreError};

/// Store key of the accent colour preference.
pub const ACCENT_COLOR_KEY: &str = "binder-accent-color";

/// OKLCH lightness/chroma/hue triples applied to the accent CSS variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccentPalette {
    pub accent: &'static str,
    pub accent_hover: &'static str,
}

/// User-selectable accent colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    /// Stylesheet defaults, no override.
    #[default]
    Default,
    Coral,
    Sage,
    Lavender,
    Rose,
    Teal,
}

impl AccentColor {
    pub const ALL: [AccentColor; 6] = [
        AccentColor::Default,
        AccentColor::Coral,
        AccentColor::Sage,
        AccentColor::Lavender,
        AccentColor::Rose,
        AccentColor::Teal,
    ];

    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AccentColor::Default => "default",
            AccentColor::Coral => "coral",
            AccentColor::Sage => "sage",
            AccentColor::Lavender => "lavender",
            AccentColor::Rose => "rose",
            AccentColor::Teal => "teal",
        }
    }

    /// Parse a stored name. Unknown names are `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Accent override, or `None` to keep the stylesheet defaults.
    #[must_use]
    pub const fn palette(self) -> Option<AccentPalette> {
        let (accent, accent_hover) = match self {
            AccentColor::Default => return None,
            AccentColor::Coral => ("0.65 0.15 25", "0.58 0.14 25"),
            AccentColor::Sage => ("0.75 0.08 140", "0.68 0.10 140"),
            AccentColor::Lavender => ("0.70 0.12 280", "0.63 0.14 280"),
            AccentColor::Rose => ("0.68 0.14 350", "0.61 0.16 350"),
            AccentColor::Teal => ("0.72 0.10 190", "0.65 0.12 190"),
        };
        Some(AccentPalette { accent, accent_hover })
    }
}

/// Reads and writes the accent colour preference.
#[derive(Clone, Debug)]
pub struct AccentPreference<S> {
    store: S,
}

impl<S: KeyValueStore> AccentPreference<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The saved accent colour. Missing, unknown or unreadable values give
    /// `AccentColor::Default`.
    #[must_use]
    pub fn load(&self) -> AccentColor {
        match self.store.get(ACCENT_COLOR_KEY) {
            Ok(Some(name)) => AccentColor::from_name(&name).unwrap_or_default(),
            Ok(None) => AccentColor::Default,
            Err(e) => {
                warn!(error = %e, "failed to read accent color");
                AccentColor::Default
            }
        }
    }

    /// Save the accent colour.
    pub fn save(&self, color: AccentColor) -> Result<(), StoreError> {
        self.store.set(ACCENT_COLOR_KEY, color.as_str())
    }
}
