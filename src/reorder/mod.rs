//! Drag-to-reorder for binder cards.
//!
//! ## Key Types
//!
//! - [`DragState`]: the gesture, in page-local slot indices
//! - [`BinderOrder`]: the card order, with O(1) snapshots
//! - [`ReorderController`]: applies drops and persists the full order

pub mod drag;
pub mod order;
pub mod controller;

pub use drag::{DragState, DropOutcome};
pub use order::BinderOrder;
pub use controller::{ReorderController, RollbackPolicy};
