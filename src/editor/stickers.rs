//! The sticker sheet and the stickers cut from it.

use image::{GenericImageView, RgbaImage};
use serde::{Deserialize, Serialize};

use super::EditorError;

/// Sticker sheet asset.
pub const STICKER_SHEET: &str = "/assets/generated/stickers-pack-01.dim_1024x1024.png";

/// Edge of one square sticker cell on the sheet, in pixels.
pub const STICKER_SIZE: u32 = 170;

/// The stickers on the sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickerKind {
    Star,
    Heart,
    Sparkle,
    Tape,
    Flower,
    Smiley,
}

impl StickerKind {
    /// All stickers, in tray order.
    pub const ALL: [StickerKind; 6] = [
        StickerKind::Star,
        StickerKind::Heart,
        StickerKind::Sparkle,
        StickerKind::Tape,
        StickerKind::Flower,
        StickerKind::Smiley,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StickerKind::Star => "star",
            StickerKind::Heart => "heart",
            StickerKind::Sparkle => "sparkle",
            StickerKind::Tape => "tape",
            StickerKind::Flower => "flower",
            StickerKind::Smiley => "smiley",
        }
    }

    /// Tray label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            StickerKind::Star => "Star",
            StickerKind::Heart => "Heart",
            StickerKind::Sparkle => "Sparkle",
            StickerKind::Tape => "Tape",
            StickerKind::Flower => "Flower",
            StickerKind::Smiley => "Smiley",
        }
    }

    /// Top-left corner of this sticker's cell: three per row, two rows.
    #[must_use]
    pub const fn origin(self) -> (u32, u32) {
        let index = self as u32;
        ((index % 3) * STICKER_SIZE, (index / 3) * STICKER_SIZE)
    }
}

/// Sticker images cut from a decoded sheet.
#[derive(Clone, Debug)]
pub struct StickerSheet {
    sprites: Vec<RgbaImage>,
}

impl StickerSheet {
    /// Cut the stickers from a decoded sheet.
    pub fn from_image(sheet: &RgbaImage) -> Result<Self, EditorError> {
        let (width, height) = sheet.dimensions();
        if width < 3 * STICKER_SIZE || height < 2 * STICKER_SIZE {
            return Err(EditorError::SheetTooSmall { width, height });
        }
        let sprites = StickerKind::ALL
            .iter()
            .map(|kind| {
                let (x, y) = kind.origin();
                sheet.view(x, y, STICKER_SIZE, STICKER_SIZE).to_image()
            })
            .collect();
        Ok(Self { sprites })
    }

    /// Decode an encoded sheet and cut the stickers from it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EditorError> {
        let sheet = image::load_from_memory(bytes)?.to_rgba8();
        Self::from_image(&sheet)
    }

    #[must_use]
    pub fn sprite(&self, kind: StickerKind) -> &RgbaImage {
        &self.sprites[kind as usize]
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn test_origins() {
        let origins: Vec<(u32, u32)> = StickerKind::ALL.iter().map(|k| k.origin()).collect();
        assert_eq!(
            origins,
            [(0, 0), (170, 0), (340, 0), (0, 170), (170, 170), (340, 170)]
        );
    }

    #[test]
    fn test_sprites_cut_from_cells() {
        let mut sheet = RgbaImage::new(1024, 1024);
        for kind in StickerKind::ALL {
            let (x, y) = kind.origin();
            sheet.put_pixel(x + 1, y + 1, Rgba([kind as u8, 0, 0, 255]));
        }

        let sheet = StickerSheet::from_image(&sheet).unwrap();
        for kind in StickerKind::ALL {
            let sprite = sheet.sprite(kind);
            assert_eq!(sprite.dimensions(), (STICKER_SIZE, STICKER_SIZE));
            assert_eq!(sprite.get_pixel(1, 1)[0], kind as u8);
        }
    }

    #[test]
    fn test_small_sheet_rejected() {
        let sheet = RgbaImage::new(400, 400);
        assert!(matches!(
            StickerSheet::from_image(&sheet),
            Err(EditorError::SheetTooSmall { width: 400, height: 400 })
        ));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&StickerKind::Smiley).unwrap(), "\"smiley\"");
        assert_eq!(StickerKind::Tape.as_str(), "tape");
    }
}
