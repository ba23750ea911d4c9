//! Pagination of binder cards into fixed-size grid pages.
//!
//! ## Key Types
//!
//! - `Pager`: current-page state with clamped navigation
//! - `Page`: one displayed page (index, offset, items)
//! - `SwipeTracker`: touch gestures that turn pages
//!
//! Pagination is index-based: a card's page is `index / cards_per_page`,
//! whatever its stored position says.

pub mod pager;
pub mod swipe;

pub use pager::{page_range, paginate, total_pages, Page, Pager};
pub use swipe::{SwipeDirection, SwipeTracker};
