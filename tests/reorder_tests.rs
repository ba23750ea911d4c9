//! Drag-reorder integration tests.
//!
//! These tests run drag gestures through a `BinderSession` against the
//! in-memory backend and check what is persisted.

use std::sync::Arc;

use photocard_binder::backend::{BackendError, BinderBackend, MemoryBackend, TimedBackend};
use photocard_binder::core::{Binder, Card, ErrorKind, GridLayout, ImageRef};
use photocard_binder::reorder::{DragState, RollbackPolicy};
use photocard_binder::session::BinderSession;

fn binder(n: usize) -> Binder {
    let cards = (0..n)
        .map(|i| Card::new(format!("c{i}"), format!("Card {i}"), ImageRef::from_url("mem://x")))
        .collect();
    Binder::new("b1", "Reorder").with_cards(cards)
}

fn open(n: usize) -> (Arc<MemoryBackend>, BinderSession<Arc<MemoryBackend>>) {
    let backend = Arc::new(MemoryBackend::new("me"));
    let binder = binder(n);
    backend.insert_binder(binder.clone());
    let session = BinderSession::new(Arc::clone(&backend), binder, GridLayout::new(3, 3)).unwrap();
    (backend, session)
}

fn visible_ids(session: &BinderSession<Arc<MemoryBackend>>) -> Vec<String> {
    session.visible().iter().map(|v| v.card.id.to_string()).collect()
}

// =============================================================================
// Drop Tests
// =============================================================================

/// Test that dropping a card on itself changes and persists nothing.
#[tokio::test]
async fn test_drop_on_self() {
    let (backend, mut session) = open(5);

    session.start_drag(3);
    session.drag_over(3);
    assert!(!session.drop_on(3).await.unwrap());

    assert_eq!(backend.call_count("reorderCards"), 0);
    assert_eq!(visible_ids(&session), ["c0", "c1", "c2", "c3", "c4"]);
    assert_eq!(session.drag_state(), DragState::Idle);
}

/// Test a move on the first page and the persisted order.
#[tokio::test]
async fn test_move_persists_full_order() {
    let (backend, mut session) = open(5);

    session.start_drag(4);
    session.drag_over(1);
    assert!(session.drop_on(1).await.unwrap());

    assert_eq!(visible_ids(&session), ["c0", "c4", "c1", "c2", "c3"]);
    let stored: Vec<String> = backend
        .binder(session.binder_id())
        .unwrap()
        .cards
        .iter()
        .map(|c| c.id.to_string())
        .collect();
    assert_eq!(stored, ["c0", "c4", "c1", "c2", "c3"]);
    assert_eq!(backend.call_count("reorderCards"), 1);
}

/// Test that page-local slots map to global positions on later pages.
#[tokio::test]
async fn test_move_on_last_page() {
    let (backend, mut session) = open(25);
    session.go_to_page(2);
    assert_eq!(session.page_offset(), 18);

    session.start_drag(6);
    session.drop_on(0).await.unwrap();

    assert_eq!(session.visible()[0].card.id.as_str(), "c24");
    assert_eq!(session.visible()[0].index, 18);
    let stored = backend.binder(session.binder_id()).unwrap();
    assert_eq!(stored.cards[18].id.as_str(), "c24");
    assert_eq!(stored.cards[24].id.as_str(), "c23");
}

/// Test that a slot past the displayed page is refused instead of reaching
/// into the next page.
#[tokio::test]
async fn test_drop_past_page_rejected() {
    let (backend, mut session) = open(12);

    session.start_drag(0);
    let err = session.drop_on(9).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(backend.call_count("reorderCards"), 0);
    assert_eq!(session.drag_state(), DragState::Idle);
    assert_eq!(session.visible()[0].card.id.as_str(), "c0");

    // the short last page only accepts its own three slots
    session.next_page();
    session.start_drag(0);
    assert!(session.drop_on(3).await.is_err());
    session.start_drag(0);
    assert!(session.drop_on(2).await.unwrap());
}

/// Test that a drop without a drag is ignored.
#[tokio::test]
async fn test_drop_without_drag() {
    let (backend, mut session) = open(3);
    session.drag_over(1);
    assert!(!session.drop_on(1).await.unwrap());
    assert_eq!(backend.call_count("reorderCards"), 0);
}

/// Test that a cancelled drag leaves the order alone.
#[tokio::test]
async fn test_cancelled_drag() {
    let (backend, mut session) = open(3);
    session.start_drag(0);
    session.drag_over(2);
    session.cancel_drag();
    assert!(!session.drop_on(2).await.unwrap());
    assert_eq!(backend.call_count("reorderCards"), 0);
}

// =============================================================================
// Failure Tests
// =============================================================================

/// Test that a failed save keeps the moved order by default.
#[tokio::test]
async fn test_failed_save_keeps_order() {
    let (backend, mut session) = open(3);
    backend.fail_next("reorderCards", BackendError::Transport("offline".into()));

    session.start_drag(0);
    let err = session.drop_on(2).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(visible_ids(&session), ["c1", "c2", "c0"]);
    assert_eq!(session.drag_state(), DragState::Idle);

    // the backend still has the old order; a refresh brings it back
    let stored = backend.binder(session.binder_id()).unwrap();
    session.refresh(stored);
    assert_eq!(visible_ids(&session), ["c0", "c1", "c2"]);
}

/// Test that the restore policy rolls the order back on failure.
#[tokio::test]
async fn test_failed_save_restores_order() {
    let (backend, session) = open(3);
    let mut session = session.with_rollback(RollbackPolicy::RestorePrevious);
    backend.fail_next("reorderCards", BackendError::Rejected("stale order".into()));

    session.start_drag(0);
    assert!(session.drop_on(2).await.is_err());
    assert_eq!(visible_ids(&session), ["c0", "c1", "c2"]);
}

/// Test that a reorder through the timeout wrapper reaches the backend.
#[tokio::test]
async fn test_reorder_through_timed_backend() {
    let inner = Arc::new(MemoryBackend::new("me"));
    let binder = binder(4);
    inner.insert_binder(binder.clone());
    let backend = TimedBackend::new(Arc::clone(&inner));

    let mut session = BinderSession::new(backend, binder, GridLayout::new(2, 2)).unwrap();
    session.next_page();
    session.start_drag(1);
    assert!(session.drop_on(0).await.unwrap());

    let stored = inner.get_binders().await.unwrap();
    let ids: Vec<&str> = stored[0].cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["c0", "c1", "c3", "c2"]);
}
