//! Horizontal swipe detection for page turning on touch screens.
//!
//! A gesture only counts as a swipe once the finger has moved more than
//! `DRAG_SLOP` pixels horizontally, and more horizontally than vertically.
//! On release, a horizontal travel beyond the threshold turns the page:
//! swiping left shows the next page, swiping right the previous one.

use super::pager::Pager;

/// Horizontal movement below which a touch is still a tap.
pub const DRAG_SLOP: f32 = 10.0;

/// Direction of a completed swipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved right to left: next page.
    Left,
    /// Finger moved left to right: previous page.
    Right,
}

impl SwipeDirection {
    /// Turn the page this swipe asks for.
    pub fn apply(self, pager: &mut Pager, total_cards: usize) {
        match self {
            SwipeDirection::Left => pager.next_page(total_cards),
            SwipeDirection::Right => pager.prev_page(total_cards),
        }
    }
}

/// Tracks one touch gesture at a time.
#[derive(Clone, Debug)]
pub struct SwipeTracker {
    threshold: f32,
    start: Option<(f32, f32)>,
    dragging: bool,
}

impl SwipeTracker {
    /// Create a tracker that fires after `threshold` pixels of travel.
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            start: None,
            dragging: false,
        }
    }

    /// Finger down.
    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
        self.dragging = false;
    }

    /// Finger moved.
    pub fn touch_move(&mut self, x: f32, y: f32) {
        let Some((sx, sy)) = self.start else {
            return;
        };
        let dx = (x - sx).abs();
        let dy = (y - sy).abs();
        if dx > dy && dx > DRAG_SLOP {
            self.dragging = true;
        }
    }

    /// Finger up. Returns the swipe, if the gesture was one.
    pub fn touch_end(&mut self, x: f32) -> Option<SwipeDirection> {
        let start = self.start.take();
        let dragging = std::mem::take(&mut self.dragging);
        let (sx, _) = start?;
        if !dragging {
            return None;
        }

        let dx = x - sx;
        if dx.abs() <= self.threshold {
            return None;
        }
        Some(if dx > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        })
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(50.0)
    }
}
