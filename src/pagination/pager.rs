//! Index-based pagination of an ordered card list.
//!
//! Page membership is a pure function of a card's index in the list and the
//! page capacity. The only state a `Pager` keeps is the page the user asked
//! for; the page actually shown is that request clamped to the pages that
//! exist right now, so shrinking the list or growing the capacity never
//! leaves the pager out of range.

use std::num::NonZeroUsize;
use std::ops::Range;

use crate::core::{GridLayout, ValidationError};

/// Number of pages needed for `total` items: `max(1, ceil(total / per_page))`.
///
/// An empty collection still has one (empty) page.
#[must_use]
pub fn total_pages(total: usize, per_page: NonZeroUsize) -> usize {
    total.div_ceil(per_page.get()).max(1)
}

/// Index range of `page` within a list of `total` items.
///
/// Pages past the end yield an empty range at `total`.
#[must_use]
pub fn page_range(page: usize, total: usize, per_page: NonZeroUsize) -> Range<usize> {
    let start = page.saturating_mul(per_page.get()).min(total);
    let end = start.saturating_add(per_page.get()).min(total);
    start..end
}

/// Split `items` into consecutive pages of `per_page`.
///
/// Always yields `total_pages(items.len(), per_page)` slices; for an empty
/// list that is a single empty slice.
pub fn paginate<T>(items: &[T], per_page: NonZeroUsize) -> impl Iterator<Item = &[T]> {
    let pages = total_pages(items.len(), per_page);
    (0..pages).map(move |page| &items[page_range(page, items.len(), per_page)])
}

/// One page of a paginated list, as displayed.
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Zero-based index of this page.
    pub index: usize,
    /// Pages in the whole list.
    pub total_pages: usize,
    /// Global index of the first item on this page.
    pub offset: usize,
    /// Items on this page, in order.
    pub items: &'a [T],
}

impl<'a, T> Page<'a, T> {
    /// Check if a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.index + 1 < self.total_pages
    }

    /// Check if an earlier page exists.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    /// Convert a slot index on this page into an index into the whole list.
    #[must_use]
    pub fn global_index(&self, local: usize) -> usize {
        self.offset + local
    }

    /// One-based page number for display.
    #[must_use]
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Page navigation state.
///
/// ## Usage
///
/// ```
/// use std::num::NonZeroUsize;
/// use photocard_binder::pagination::Pager;
///
/// let cards: Vec<u32> = (0..25).collect();
/// let mut pager = Pager::new(NonZeroUsize::new(9).unwrap());
///
/// assert_eq!(pager.total_pages(cards.len()), 3);
///
/// for _ in 0..3 {
///     pager.next_page(cards.len());
/// }
/// let page = pager.page(&cards);
/// assert_eq!(page.index, 2);
/// assert_eq!(page.items.len(), 7);
/// assert!(!page.has_next());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    requested: usize,
    cards_per_page: NonZeroUsize,
}

impl Pager {
    /// Create a pager on the first page.
    #[must_use]
    pub fn new(cards_per_page: NonZeroUsize) -> Self {
        Self {
            requested: 0,
            cards_per_page,
        }
    }

    /// Create a pager sized for a grid layout.
    pub fn for_layout(layout: GridLayout) -> Result<Self, ValidationError> {
        Ok(Self::new(layout.page_capacity()?))
    }

    /// Page capacity.
    #[must_use]
    pub fn cards_per_page(&self) -> NonZeroUsize {
        self.cards_per_page
    }

    /// Change the page capacity. The current page re-clamps on next read.
    pub fn set_cards_per_page(&mut self, cards_per_page: NonZeroUsize) {
        self.cards_per_page = cards_per_page;
    }

    /// Pages needed for `total_cards`.
    #[must_use]
    pub fn total_pages(&self, total_cards: usize) -> usize {
        total_pages(total_cards, self.cards_per_page)
    }

    /// The displayed page, clamped to `[0, total_pages - 1]`.
    #[must_use]
    pub fn current_page(&self, total_cards: usize) -> usize {
        self.requested.min(self.total_pages(total_cards) - 1)
    }

    /// Check if `next_page` would move.
    #[must_use]
    pub fn has_next(&self, total_cards: usize) -> bool {
        self.current_page(total_cards) + 1 < self.total_pages(total_cards)
    }

    /// Check if `prev_page` would move.
    #[must_use]
    pub fn has_prev(&self, total_cards: usize) -> bool {
        self.current_page(total_cards) > 0
    }

    /// Jump to `page`, clamped to the pages that exist.
    pub fn go_to_page(&mut self, page: usize, total_cards: usize) {
        self.requested = page.min(self.total_pages(total_cards) - 1);
    }

    /// Advance one page. No-op on the last page.
    pub fn next_page(&mut self, total_cards: usize) {
        let current = self.current_page(total_cards);
        if current + 1 < self.total_pages(total_cards) {
            self.requested = current + 1;
        }
    }

    /// Go back one page. No-op on the first page.
    pub fn prev_page(&mut self, total_cards: usize) {
        let current = self.current_page(total_cards);
        if current > 0 {
            self.requested = current - 1;
        }
    }

    /// The displayed page of `cards`.
    #[must_use]
    pub fn page<'a, T>(&self, cards: &'a [T]) -> Page<'a, T> {
        let index = self.current_page(cards.len());
        let range = page_range(index, cards.len(), self.cards_per_page);
        Page {
            index,
            total_pages: self.total_pages(cards.len()),
            offset: range.start,
            items: &cards[range],
        }
    }
}
