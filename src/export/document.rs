//! The printable page document.

use askama::Template;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::warn;

use crate::core::Card;
use crate::images::{DataUrl, Quality};
use crate::overlays::CardOverlays;

use super::ExportError;

/// Card slots on a printed page (a 3-column grid of four rows).
pub const PAGE_SLOTS: usize = 12;

/// Page colour used when a theme's colour cannot be embedded safely.
pub const DEFAULT_PAGE_BACKGROUND: &str = "#FFF8F0";

/// Paper size of the printed page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// CSS page width.
    #[must_use]
    pub const fn width(self) -> &'static str {
        match self {
            PageSize::A4 => "210mm",
            PageSize::Letter => "8.5in",
        }
    }

    /// CSS page height.
    #[must_use]
    pub const fn height(self) -> &'static str {
        match self {
            PageSize::A4 => "297mm",
            PageSize::Letter => "11in",
        }
    }
}

/// Options chosen in the export dialog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub page_size: PageSize,
    pub quality: Quality,
}

impl ExportOptions {
    /// Create options with a different paper size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Create options with a different image quality.
    #[must_use]
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }
}

/// A card ready to be printed: its name, inline image and overlays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedCard {
    pub name: String,
    pub image: DataUrl,
    pub overlays: CardOverlays,
}

impl ResolvedCard {
    #[must_use]
    pub fn new(card: &Card, image: DataUrl) -> Self {
        Self {
            name: card.name.clone(),
            image,
            overlays: CardOverlays::for_card(card),
        }
    }
}

#[derive(Template)]
#[template(path = "print_page.html")]
struct PrintPageTemplate<'a> {
    title: String,
    page_width: &'static str,
    page_height: &'static str,
    background: &'a str,
    cards: &'a [ResolvedCard],
    empty_slots: usize,
}

/// One binder page laid out for printing.
#[derive(Clone, Debug)]
pub struct PageDocument {
    binder_name: String,
    page_number: usize,
    page_size: PageSize,
    background: String,
    slots: usize,
    cards: SmallVec<[ResolvedCard; PAGE_SLOTS]>,
}

impl PageDocument {
    /// Create an empty page. `page_number` is 1-based.
    #[must_use]
    pub fn new(binder_name: impl Into<String>, page_number: usize, page_size: PageSize) -> Self {
        Self {
            binder_name: binder_name.into(),
            page_number,
            page_size,
            background: DEFAULT_PAGE_BACKGROUND.to_string(),
            slots: PAGE_SLOTS,
            cards: SmallVec::new(),
        }
    }

    /// Set the page background colour.
    ///
    /// Anything that is not a plain CSS colour value is replaced by
    /// [`DEFAULT_PAGE_BACKGROUND`], since it is embedded in a style sheet.
    #[must_use]
    pub fn with_background(mut self, color: &str) -> Self {
        self.background = if is_plain_css_color(color) {
            color.trim().to_string()
        } else {
            warn!(color, "unsafe page background, using default");
            DEFAULT_PAGE_BACKGROUND.to_string()
        };
        self
    }

    /// Set the number of card slots (at least one).
    #[must_use]
    pub fn with_slots(mut self, slots: usize) -> Self {
        self.slots = slots.max(1);
        self.cards.truncate(self.slots);
        self
    }

    /// Add cards in order. Cards beyond the slot count are not rendered.
    #[must_use]
    pub fn with_cards(mut self, cards: impl IntoIterator<Item = ResolvedCard>) -> Self {
        let mut dropped = 0usize;
        for card in cards {
            if !self.push(card) {
                dropped += 1;
            }
        }
        if dropped > 0 {
            warn!(dropped, slots = self.slots, "page is full, extra cards not rendered");
        }
        self
    }

    /// Add one card. Returns `false` when the page is already full.
    pub fn push(&mut self, card: ResolvedCard) -> bool {
        if self.cards.len() >= self.slots {
            return false;
        }
        self.cards.push(card);
        true
    }

    /// Document title, also shown by the print dialog.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} - Page {}", self.binder_name, self.page_number)
    }

    #[must_use]
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    #[must_use]
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    #[must_use]
    pub fn cards(&self) -> &[ResolvedCard] {
        &self.cards
    }

    /// Slots rendered as empty placeholders.
    #[must_use]
    pub fn empty_slots(&self) -> usize {
        self.slots - self.cards.len()
    }

    /// Render the self-contained HTML document.
    pub fn render(&self) -> Result<String, ExportError> {
        let template = PrintPageTemplate {
            title: self.title(),
            page_width: self.page_size.width(),
            page_height: self.page_size.height(),
            background: &self.background,
            cards: &self.cards,
            empty_slots: self.empty_slots(),
        };
        Ok(template.render()?)
    }
}

fn is_plain_css_color(color: &str) -> bool {
    let color = color.trim();
    !color.is_empty()
        && color.len() <= 64
        && color
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' ' | '-' | '/'))
}
