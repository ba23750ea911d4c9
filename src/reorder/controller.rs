//! Applying drops and persisting the new order.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::BinderBackend;
use crate::core::{BinderId, Card, Error, ValidationError};

use super::{BinderOrder, DragState, DropOutcome};

/// What happens to the local order when persisting a move fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RollbackPolicy {
    /// Leave the moved order in place; the next refresh from the backend
    /// corrects it.
    #[default]
    KeepOptimistic,
    /// Put back the order from before the move.
    RestorePrevious,
}

/// Owns a binder's card order and the drag gesture over it.
///
/// ## Usage
///
/// ```
/// use std::sync::Arc;
/// use photocard_binder::backend::MemoryBackend;
/// use photocard_binder::core::{Binder, Card, ImageRef};
/// use photocard_binder::reorder::ReorderController;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let cards: Vec<Card> = ["a", "b", "c"]
///     .into_iter()
///     .map(|id| Card::new(id, id, ImageRef::from_url("mem://x")))
///     .collect();
/// let binder = Binder::new("b1", "Mine").with_cards(cards);
/// let backend = Arc::new(MemoryBackend::new("me"));
/// backend.insert_binder(binder.clone());
///
/// let mut reorder = ReorderController::new(Arc::clone(&backend), binder.id.clone(), binder.cards);
/// reorder.start_drag(0);
/// reorder.drag_over(2);
/// assert!(reorder.drop_on(2, 0..3).await.unwrap());
///
/// let ids: Vec<String> = reorder.order().ids().iter().map(ToString::to_string).collect();
/// assert_eq!(ids, ["b", "c", "a"]);
/// # });
/// ```
#[derive(Debug)]
pub struct ReorderController<B> {
    backend: B,
    binder: BinderId,
    order: BinderOrder,
    drag: DragState,
    rollback: RollbackPolicy,
}

impl<B: BinderBackend> ReorderController<B> {
    pub fn new(backend: B, binder: BinderId, cards: Vec<Card>) -> Self {
        Self {
            backend,
            binder,
            order: BinderOrder::new(cards),
            drag: DragState::Idle,
            rollback: RollbackPolicy::default(),
        }
    }

    /// Create a controller with a different rollback policy.
    #[must_use]
    pub fn with_rollback(mut self, rollback: RollbackPolicy) -> Self {
        self.rollback = rollback;
        self
    }

    #[must_use]
    pub fn order(&self) -> &BinderOrder {
        &self.order
    }

    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    #[must_use]
    pub fn binder_id(&self) -> &BinderId {
        &self.binder
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replace the order with a fresh copy from the backend.
    pub fn reset(&mut self, cards: Vec<Card>) {
        self.order = BinderOrder::new(cards);
        self.drag.cancel();
    }

    pub fn start_drag(&mut self, slot: usize) {
        self.drag.start(slot);
    }

    pub fn drag_over(&mut self, slot: usize) {
        self.drag.over(slot);
    }

    pub fn drag_leave(&mut self) {
        self.drag.leave();
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Drop the dragged card on page-local `slot` of the displayed page,
    /// which holds the cards at global indices `page`.
    ///
    /// Returns whether the order changed. Dropping a card on its own slot
    /// changes nothing and calls nothing, and so does a slot outside the
    /// page, which is rejected. The drag state is `Idle` afterwards,
    /// whatever the outcome.
    pub async fn drop_on(&mut self, slot: usize, page: Range<usize>) -> Result<bool, Error> {
        match self.drag.drop(slot) {
            DropOutcome::NoDrag | DropOutcome::Unchanged => Ok(false),
            DropOutcome::Move { from, to } => {
                let len = page.len();
                if let Some(index) = [from, to].into_iter().find(|&i| i >= len) {
                    warn!(binder = %self.binder, index, len, "drop outside the displayed page");
                    return Err(ValidationError::SlotOutOfRange { index, len }.into());
                }
                self.move_card(page.start + from, page.start + to).await
            }
        }
    }

    /// Move a card between global indices and persist the full order.
    ///
    /// On a backend failure the error is returned and the local order is
    /// handled per the rollback policy.
    pub async fn move_card(&mut self, from: usize, to: usize) -> Result<bool, Error> {
        if from == to {
            return Ok(false);
        }
        let previous = self.order.snapshot();
        self.order.move_card(from, to)?;
        debug!(binder = %self.binder, from, to, "card moved");

        match self.backend.reorder_cards(&self.binder, &self.order.ids()).await {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!(binder = %self.binder, error = %e, rollback = ?self.rollback, "failed to persist card order");
                if self.rollback == RollbackPolicy::RestorePrevious {
                    self.order.restore(previous);
                }
                Err(e.into())
            }
        }
    }
}
