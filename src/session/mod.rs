//! The binder view session.
//!
//! `BinderSession` ties one opened binder to its pager, swipe tracker and
//! reorder controller, and produces the view model of the visible page.
//! The card order lives in the reorder controller; every page query is
//! computed from it, so a move or a refresh is reflected immediately.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use photocard_binder::backend::MemoryBackend;
//! use photocard_binder::core::{Binder, BinderConfig, Card, ImageRef};
//! use photocard_binder::session::BinderSession;
//!
//! let cards: Vec<Card> = (0..25)
//!     .map(|i| Card::new(format!("c{i}"), format!("Card {i}"), ImageRef::from_url("mem://x")))
//!     .collect();
//! let binder = Binder::new("b1", "Mine").with_cards(cards);
//! let backend = Arc::new(MemoryBackend::new("me"));
//!
//! let mut session = BinderSession::from_config(backend, binder, Some("3x3"), &BinderConfig::default());
//! assert_eq!(session.total_pages(), 3);
//!
//! session.go_to_page(2);
//! let visible = session.visible();
//! assert_eq!(visible.len(), 7);
//! assert_eq!(visible[0].index, 18);
//! assert_eq!(session.empty_slots(), 2);
//! ```

use std::num::NonZeroUsize;

use serde::Serialize;
use tracing::debug;

use crate::backend::BinderBackend;
use crate::core::{Binder, BinderConfig, BinderId, Card, Error, GridLayout, Theme, ValidationError};
use crate::export::{ExportError, ExportOptions, ExportReceipt, PageExporter, PrintHost};
use crate::images::BlobFetcher;
use crate::overlays::CardOverlays;
use crate::pagination::{page_range, Pager, SwipeDirection, SwipeTracker};
use crate::reorder::{BinderOrder, DragState, ReorderController, RollbackPolicy};
use crate::store::KeyValueStore;

/// One visible card and what to draw on it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CardView<'a> {
    pub card: &'a Card,
    /// Index in the whole binder.
    pub index: usize,
    /// Slot on the current page.
    pub slot: usize,
    pub overlays: CardOverlays,
}

/// An opened binder.
#[derive(Debug)]
pub struct BinderSession<B> {
    name: String,
    theme: Theme,
    layout: GridLayout,
    pager: Pager,
    swipe: SwipeTracker,
    reorder: ReorderController<B>,
}

impl<B: BinderBackend> BinderSession<B> {
    /// Open `binder` with a grid layout.
    pub fn new(backend: B, binder: Binder, layout: GridLayout) -> Result<Self, ValidationError> {
        let pager = Pager::for_layout(layout)?;
        let Binder { id, name, cards, theme, .. } = binder;
        Ok(Self {
            name,
            theme,
            layout,
            pager,
            swipe: SwipeTracker::default(),
            reorder: ReorderController::new(backend, id, cards),
        })
    }

    /// Open `binder` with the user's stored layout token.
    ///
    /// Without a token the configured default layout is used. A token is
    /// read leniently: each unusable dimension falls back to 3.
    pub fn from_config(backend: B, binder: Binder, user_layout: Option<&str>, config: &BinderConfig) -> Self {
        let layout = match user_layout {
            Some(token) => GridLayout::parse_or_default(Some(token)),
            None => config.default_layout,
        };
        let capacity = layout.page_capacity().unwrap_or(NonZeroUsize::MIN);
        let Binder { id, name, cards, theme, .. } = binder;
        debug!(binder = %id, %layout, "binder opened");
        Self {
            name,
            theme,
            layout,
            pager: Pager::new(capacity),
            swipe: SwipeTracker::new(config.swipe_threshold),
            reorder: ReorderController::new(backend, id, cards),
        }
    }

    /// Create a session with a different reorder rollback policy.
    #[must_use]
    pub fn with_rollback(mut self, rollback: RollbackPolicy) -> Self {
        self.reorder = self.reorder.with_rollback(rollback);
        self
    }

    #[must_use]
    pub fn binder_id(&self) -> &BinderId {
        self.reorder.binder_id()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[must_use]
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Cards in display order.
    #[must_use]
    pub fn cards(&self) -> &BinderOrder {
        self.reorder.order()
    }

    /// Replace the binder with a fresh copy from the backend.
    ///
    /// The requested page is kept and clamps against the new card count.
    pub fn refresh(&mut self, binder: Binder) {
        self.name = binder.name;
        self.theme = binder.theme;
        self.reorder.reset(binder.cards);
    }

    /// Switch to another grid layout.
    pub fn set_layout(&mut self, layout: GridLayout) -> Result<(), ValidationError> {
        self.pager.set_cards_per_page(layout.page_capacity()?);
        self.layout = layout;
        Ok(())
    }

    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.reorder.order().len()
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.total_cards())
    }

    /// Zero-based index of the displayed page.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.pager.current_page(self.total_cards())
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.pager.has_next(self.total_cards())
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.pager.has_prev(self.total_cards())
    }

    pub fn next_page(&mut self) {
        self.pager.next_page(self.total_cards());
    }

    pub fn prev_page(&mut self) {
        self.pager.prev_page(self.total_cards());
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.pager.go_to_page(page, self.total_cards());
    }

    /// Global index of the first slot on the displayed page.
    #[must_use]
    pub fn page_offset(&self) -> usize {
        self.page_range().start
    }

    fn page_range(&self) -> std::ops::Range<usize> {
        page_range(self.current_page(), self.total_cards(), self.pager.cards_per_page())
    }

    /// Cards on the displayed page with their overlays.
    #[must_use]
    pub fn visible(&self) -> Vec<CardView<'_>> {
        let range = self.page_range();
        let offset = range.start;
        self.reorder
            .order()
            .slice(range)
            .enumerate()
            .map(|(slot, card)| CardView {
                card,
                index: offset + slot,
                slot,
                overlays: CardOverlays::for_card(card),
            })
            .collect()
    }

    /// Unfilled slots on the displayed page.
    #[must_use]
    pub fn empty_slots(&self) -> usize {
        self.pager.cards_per_page().get() - self.page_range().len()
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.swipe.touch_start(x, y);
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        self.swipe.touch_move(x, y);
    }

    /// Finish a touch gesture, turning the page if it was a swipe.
    pub fn touch_end(&mut self, x: f32) -> Option<SwipeDirection> {
        let direction = self.swipe.touch_end(x)?;
        let total = self.total_cards();
        direction.apply(&mut self.pager, total);
        Some(direction)
    }

    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.reorder.drag_state()
    }

    pub fn start_drag(&mut self, slot: usize) {
        self.reorder.start_drag(slot);
    }

    pub fn drag_over(&mut self, slot: usize) {
        self.reorder.drag_over(slot);
    }

    pub fn drag_leave(&mut self) {
        self.reorder.drag_leave();
    }

    pub fn cancel_drag(&mut self) {
        self.reorder.cancel_drag();
    }

    /// Drop the dragged card on `slot` of the displayed page.
    pub async fn drop_on(&mut self, slot: usize) -> Result<bool, Error> {
        let page = self.page_range();
        self.reorder.drop_on(slot, page).await
    }

    /// Export the displayed page.
    pub async fn export_current_page<F, S, H>(
        &self,
        exporter: &PageExporter<F, S, H>,
        options: ExportOptions,
    ) -> Result<ExportReceipt, ExportError>
    where
        F: BlobFetcher,
        S: KeyValueStore,
        H: PrintHost,
    {
        let cards: Vec<Card> = self.reorder.order().slice(self.page_range()).cloned().collect();
        exporter
            .export_page(
                &self.name,
                self.current_page() + 1,
                &cards,
                &self.theme.page_background,
                options,
            )
            .await
    }
}
