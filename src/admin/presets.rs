//! Layout preset management.
//!
//! Presets are validated locally before anything is sent: blank input, a
//! token that is not `<columns>x<rows>`, and duplicates are all rejected
//! without a backend call.

use crate::backend::BinderBackend;
use crate::core::{Error, GridLayout, ValidationError};

use super::AdminPortal;

/// Validate user input for a new preset against the existing presets.
///
/// ```
/// use photocard_binder::admin::validate_preset;
/// use photocard_binder::core::GridLayout;
///
/// let existing = [GridLayout::new(3, 3)];
/// assert_eq!(validate_preset(" 4x3 ", &existing).unwrap(), GridLayout::new(4, 3));
/// assert!(validate_preset("3x3", &existing).is_err());
/// assert!(validate_preset("axb", &existing).is_err());
/// ```
pub fn validate_preset(input: &str, existing: &[GridLayout]) -> Result<GridLayout, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyPreset);
    }
    let layout = GridLayout::parse(trimmed)?;
    if existing.contains(&layout) {
        return Err(ValidationError::DuplicatePreset(trimmed.to_string()));
    }
    Ok(layout)
}

impl<B: BinderBackend> AdminPortal<B> {
    /// Current presets.
    pub async fn layout_presets(&mut self) -> Result<Vec<GridLayout>, Error> {
        self.gate.require_unlocked()?;
        Ok(self.backend.get_layout_presets().await?)
    }

    /// Validate and add a preset.
    pub async fn add_preset(&mut self, input: &str) -> Result<GridLayout, Error> {
        self.gate.require_unlocked()?;
        // format errors never need the preset list
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyPreset.into());
        }
        GridLayout::parse(trimmed)?;

        let existing = self.backend.get_layout_presets().await?;
        let layout = validate_preset(trimmed, &existing)?;
        self.backend.add_layout_preset(&layout).await?;
        Ok(layout)
    }

    /// Remove a preset.
    pub async fn remove_preset(&mut self, layout: &GridLayout) -> Result<(), Error> {
        self.gate.require_unlocked()?;
        self.backend.remove_layout_preset(layout).await?;
        Ok(())
    }

    /// Make an existing preset the default layout for new users.
    pub async fn set_default_layout(&mut self, layout: &GridLayout) -> Result<(), Error> {
        self.gate.require_unlocked()?;
        let existing = self.backend.get_layout_presets().await?;
        if !existing.contains(layout) {
            return Err(ValidationError::UnknownPreset(layout.to_string()).into());
        }
        self.backend.set_default_layout(layout).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_preset_errors() {
        let existing = [GridLayout::new(3, 3), GridLayout::new(4, 3)];
        assert_eq!(validate_preset("", &existing), Err(ValidationError::EmptyPreset));
        assert_eq!(validate_preset("   ", &existing), Err(ValidationError::EmptyPreset));
        assert!(matches!(
            validate_preset("3", &existing),
            Err(ValidationError::InvalidLayout(_))
        ));
        assert!(matches!(
            validate_preset("3 x 3", &existing),
            Err(ValidationError::InvalidLayout(_))
        ));
        assert_eq!(
            validate_preset(" 4x3", &existing),
            Err(ValidationError::DuplicatePreset("4x3".into()))
        );
        assert_eq!(validate_preset("2x2", &existing), Ok(GridLayout::new(2, 2)));
    }

    #[test]
    fn test_messages() {
        assert_eq!(ValidationError::EmptyPreset.to_string(), "Please enter a preset value");
        assert_eq!(
            ValidationError::InvalidLayout("3".into()).to_string(),
            "Invalid format. Use format like \"3x3\" or \"4x3\""
        );
    }
}
