//! Drag-and-drop state for card slots.
//!
//! Slot indices here are page-local. The state machine only tracks the
//! gesture; moving cards is [`super::BinderOrder`]'s job.

/// Where a drag gesture stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    /// A card is being dragged.
    Dragging { source: usize },
    /// A dragged card is hovering over another slot.
    DragOver { source: usize, target: usize },
}

/// Result of dropping a dragged card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing was being dragged.
    NoDrag,
    /// The card was dropped on its own slot.
    Unchanged,
    /// Move the card in slot `from` to slot `to`.
    Move { from: usize, to: usize },
}

impl DragState {
    /// Begin dragging the card in `source`, abandoning any earlier gesture.
    pub fn start(&mut self, source: usize) {
        *self = DragState::Dragging { source };
    }

    /// The dragged card entered slot `target`. Ignored when idle.
    pub fn over(&mut self, target: usize) {
        if let Some(source) = self.source() {
            *self = DragState::DragOver { source, target };
        }
    }

    /// The dragged card left the slot it was over.
    pub fn leave(&mut self) {
        if let DragState::DragOver { source, .. } = *self {
            *self = DragState::Dragging { source };
        }
    }

    /// Drop on `target`. Always returns to `Idle`.
    pub fn drop(&mut self, target: usize) -> DropOutcome {
        let outcome = match self.source() {
            None => DropOutcome::NoDrag,
            Some(source) if source == target => DropOutcome::Unchanged,
            Some(source) => DropOutcome::Move { from: source, to: target },
        };
        *self = DragState::Idle;
        outcome
    }

    /// Abandon the gesture.
    pub fn cancel(&mut self) {
        *self = DragState::Idle;
    }

    #[must_use]
    pub fn source(&self) -> Option<usize> {
        match *self {
            DragState::Idle => None,
            DragState::Dragging { source } | DragState::DragOver { source, .. } => Some(source),
        }
    }

    /// Slot currently hovered, for highlighting.
    #[must_use]
    pub fn target(&self) -> Option<usize> {
        match *self {
            DragState::DragOver { target, .. } => Some(target),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        *self == DragState::Idle
    }
}
