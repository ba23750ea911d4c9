//! The card editing canvas.
//!
//! Stickers are stored with their centre, scale and rotation and only
//! rasterized when the canvas is rendered. Pointer coordinates are in base
//! image pixels.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Pixel, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::CardId;
use crate::images::DataUrl;
use crate::store::{EditedImageCache, KeyValueStore};

use super::stickers::{StickerKind, StickerSheet, STICKER_SIZE};
use super::EditorError;

/// Rotation applied by one press of the rotate button, in degrees.
pub const ROTATION_STEP: u16 = 45;

/// A sticker placed on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedSticker {
    pub id: u32,
    pub kind: StickerKind,
    /// Centre, in base image pixels.
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// Clockwise rotation in degrees, `0..360`.
    pub rotation: u16,
}

impl PlacedSticker {
    /// Half the edge of the (unrotated) square the sticker covers.
    #[must_use]
    pub fn half_extent(&self) -> f32 {
        STICKER_SIZE as f32 * self.scale / 2.0
    }

    /// Check if `(x, y)` falls in the sticker's unrotated square.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let half = self.half_extent();
        (x - self.x).abs() <= half && (y - self.y).abs() <= half
    }
}

/// A base image with stickers on top.
///
/// ## Usage
///
/// ```
/// use image::RgbaImage;
/// use photocard_binder::editor::{StickerCanvas, StickerKind};
///
/// let mut canvas = StickerCanvas::new(RgbaImage::new(400, 600));
/// let id = canvas.add(StickerKind::Heart);
/// assert_eq!(canvas.selected(), Some(id));
/// assert_eq!(canvas.hit_test(200.0, 300.0), Some(id));
///
/// canvas.rotate_selected();
/// assert_eq!(canvas.stickers()[0].rotation, 45);
/// ```
#[derive(Clone, Debug)]
pub struct StickerCanvas {
    base: RgbaImage,
    stickers: Vec<PlacedSticker>,
    selected: Option<u32>,
    grab: Option<(f32, f32)>,
    next_id: u32,
}

impl StickerCanvas {
    #[must_use]
    pub fn new(base: RgbaImage) -> Self {
        Self {
            base,
            stickers: Vec::new(),
            selected: None,
            grab: None,
            next_id: 1,
        }
    }

    /// Start editing an encoded image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EditorError> {
        Ok(Self::new(image::load_from_memory(bytes)?.to_rgba8()))
    }

    /// Start editing a data URL, such as a previously edited card.
    pub fn from_data_url(url: &DataUrl) -> Result<Self, EditorError> {
        Self::from_bytes(&url.decode()?)
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.base.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.base.height()
    }

    /// Stickers, bottom to top.
    #[must_use]
    pub fn stickers(&self) -> &[PlacedSticker] {
        &self.stickers
    }

    #[must_use]
    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    /// Place a sticker at the centre of the canvas and select it.
    pub fn add(&mut self, kind: StickerKind) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.stickers.push(PlacedSticker {
            id,
            kind,
            x: self.base.width() as f32 / 2.0,
            y: self.base.height() as f32 / 2.0,
            scale: 1.0,
            rotation: 0,
        });
        self.selected = Some(id);
        id
    }

    /// Topmost sticker under `(x, y)`.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<u32> {
        self.stickers.iter().rev().find(|s| s.contains(x, y)).map(|s| s.id)
    }

    /// Pointer pressed: select and grab the sticker under it, or clear the
    /// selection.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Option<u32> {
        self.selected = self.hit_test(x, y);
        self.grab = self
            .selected_sticker()
            .map(|s| (x - s.x, y - s.y));
        self.selected
    }

    /// Pointer moved: drag the grabbed sticker.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let Some((dx, dy)) = self.grab else {
            return;
        };
        if let Some(sticker) = self.selected_sticker_mut() {
            sticker.x = x - dx;
            sticker.y = y - dy;
        }
    }

    pub fn pointer_up(&mut self) {
        self.grab = None;
    }

    /// Rotate the selected sticker by [`ROTATION_STEP`].
    pub fn rotate_selected(&mut self) {
        if let Some(sticker) = self.selected_sticker_mut() {
            sticker.rotation = (sticker.rotation + ROTATION_STEP) % 360;
        }
    }

    /// Set the selected sticker's scale. Non-positive or non-finite scales
    /// are ignored.
    pub fn scale_selected(&mut self, scale: f32) {
        if !(scale.is_finite() && scale > 0.0) {
            return;
        }
        if let Some(sticker) = self.selected_sticker_mut() {
            sticker.scale = scale;
        }
    }

    /// Delete the selected sticker.
    pub fn remove_selected(&mut self) {
        if let Some(id) = self.selected.take() {
            self.stickers.retain(|s| s.id != id);
            self.grab = None;
        }
    }

    fn selected_sticker(&self) -> Option<&PlacedSticker> {
        let id = self.selected?;
        self.stickers.iter().find(|s| s.id == id)
    }

    fn selected_sticker_mut(&mut self) -> Option<&mut PlacedSticker> {
        let id = self.selected?;
        self.stickers.iter_mut().find(|s| s.id == id)
    }

    /// Composite the stickers onto a copy of the base image.
    #[must_use]
    pub fn render(&self, sheet: &StickerSheet) -> RgbaImage {
        let mut out = self.base.clone();
        for sticker in &self.stickers {
            draw_sticker(&mut out, sheet.sprite(sticker.kind), sticker);
        }
        out
    }

    /// Render and encode as a PNG data URL.
    pub fn to_data_url(&self, sheet: &StickerSheet) -> Result<DataUrl, EditorError> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(self.render(sheet)).write_to(&mut out, ImageFormat::Png)?;
        Ok(DataUrl::from_parts("image/png", &out.into_inner()))
    }

    /// Render and store the result as the edited image of `card`.
    pub fn save<S: KeyValueStore>(
        &self,
        sheet: &StickerSheet,
        card: &CardId,
        cache: &EditedImageCache<S>,
    ) -> Result<DataUrl, EditorError> {
        let url = self.to_data_url(sheet)?;
        cache.save(card, &url)?;
        info!(card = %card, stickers = self.stickers.len(), bytes = url.len(), "edited image saved");
        Ok(url)
    }
}

/// Draw `sprite` centred at the sticker position, scaled then rotated,
/// sampling nearest-neighbour and blending over `canvas`.
fn draw_sticker(canvas: &mut RgbaImage, sprite: &RgbaImage, sticker: &PlacedSticker) {
    let (sw, sh) = (sprite.width() as f32, sprite.height() as f32);
    let radius = sw.hypot(sh) * sticker.scale / 2.0;
    let x0 = (sticker.x - radius).floor().max(0.0) as u32;
    let y0 = (sticker.y - radius).floor().max(0.0) as u32;
    let x1 = ((sticker.x + radius).ceil().max(0.0) as u32).min(canvas.width());
    let y1 = ((sticker.y + radius).ceil().max(0.0) as u32).min(canvas.height());

    let (sin, cos) = f32::from(sticker.rotation).to_radians().sin_cos();
    let mut drawn = 0usize;
    for py in y0..y1 {
        for px in x0..x1 {
            let dx = px as f32 + 0.5 - sticker.x;
            let dy = py as f32 + 0.5 - sticker.y;
            // inverse rotation, then inverse scale
            let u = (dx * cos + dy * sin) / sticker.scale + sw / 2.0;
            let v = (-dx * sin + dy * cos) / sticker.scale + sh / 2.0;
            if u < 0.0 || v < 0.0 || u >= sw || v >= sh {
                continue;
            }
            let src = *sprite.get_pixel(u as u32, v as u32);
            if src[3] == 0 {
                continue;
            }
            canvas.get_pixel_mut(px, py).blend(&src);
            drawn += 1;
        }
    }
    debug!(sticker = sticker.id, kind = sticker.kind.as_str(), drawn, "sticker drawn");
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::store::MemoryStore;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    /// A sheet where the star cell is solid red and everything else is
    /// transparent.
    fn sheet() -> StickerSheet {
        let mut sheet = RgbaImage::new(1024, 1024);
        for y in 0..STICKER_SIZE {
            for x in 0..STICKER_SIZE {
                sheet.put_pixel(x, y, RED);
            }
        }
        StickerSheet::from_image(&sheet).unwrap()
    }

    fn canvas() -> StickerCanvas {
        StickerCanvas::new(RgbaImage::from_pixel(400, 400, WHITE))
    }

    #[test]
    fn test_add_centres_and_selects() {
        let mut canvas = canvas();
        let id = canvas.add(StickerKind::Star);
        let sticker = canvas.stickers()[0];
        assert_eq!((sticker.x, sticker.y, sticker.scale), (200.0, 200.0, 1.0));
        assert_eq!(canvas.selected(), Some(id));
    }

    #[test]
    fn test_hit_test_topmost() {
        let mut canvas = canvas();
        let bottom = canvas.add(StickerKind::Star);
        let top = canvas.add(StickerKind::Heart);

        assert_eq!(canvas.hit_test(200.0, 200.0), Some(top));
        assert_eq!(canvas.hit_test(0.0, 0.0), None);

        canvas.remove_selected();
        assert_eq!(canvas.hit_test(200.0, 200.0), Some(bottom));
        assert_eq!(canvas.selected(), None);
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let mut canvas = canvas();
        canvas.add(StickerKind::Star);

        assert!(canvas.pointer_down(210.0, 190.0).is_some());
        canvas.pointer_move(310.0, 290.0);
        canvas.pointer_up();
        canvas.pointer_move(0.0, 0.0);

        let sticker = canvas.stickers()[0];
        assert_eq!((sticker.x, sticker.y), (300.0, 300.0));
    }

    #[test]
    fn test_click_on_empty_space_deselects() {
        let mut canvas = canvas();
        canvas.add(StickerKind::Star);
        assert_eq!(canvas.pointer_down(5.0, 5.0), None);
        assert_eq!(canvas.selected(), None);

        canvas.rotate_selected();
        assert_eq!(canvas.stickers()[0].rotation, 0);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut canvas = canvas();
        canvas.add(StickerKind::Star);
        for _ in 0..9 {
            canvas.rotate_selected();
        }
        assert_eq!(canvas.stickers()[0].rotation, 45);
    }

    #[test]
    fn test_render_composites_sprite() {
        let sheet = sheet();
        let mut canvas = canvas();
        canvas.add(StickerKind::Star);

        let out = canvas.render(&sheet);
        assert_eq!(*out.get_pixel(200, 200), RED);
        assert_eq!(*out.get_pixel(200 + 84, 200), RED);
        assert_eq!(*out.get_pixel(200 + 90, 200), WHITE);
        assert_eq!(*out.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn test_render_rotated_and_scaled() {
        let sheet = sheet();
        let mut canvas = canvas();
        canvas.add(StickerKind::Star);
        canvas.rotate_selected();

        // the rotated square reaches further along the axes
        let out = canvas.render(&sheet);
        assert_eq!(*out.get_pixel(200 + 110, 200), RED);

        canvas.scale_selected(0.5);
        let out = canvas.render(&sheet);
        assert_eq!(*out.get_pixel(200 + 70, 200), WHITE);
        assert_eq!(*out.get_pixel(200 + 50, 200), RED);
    }

    #[test]
    fn test_transparent_sprite_leaves_base() {
        let sheet = sheet();
        let mut canvas = canvas();
        canvas.add(StickerKind::Smiley);
        assert_eq!(*canvas.render(&sheet).get_pixel(200, 200), WHITE);
    }

    #[test]
    fn test_save_to_cache() {
        let sheet = sheet();
        let mut canvas = canvas();
        canvas.add(StickerKind::Star);

        let cache = EditedImageCache::new(MemoryStore::new());
        let card = CardId::new("c1");
        let url = canvas.save(&sheet, &card, &cache).unwrap();

        assert_eq!(url.mime_type(), "image/png");
        assert_eq!(cache.get(&card), Some(url.clone()));

        let reopened = StickerCanvas::from_data_url(&url).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (400, 400));
    }
}
