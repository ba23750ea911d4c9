//! Core types: identifiers, cards, binders, themes, layouts, configuration
//! and the error taxonomy.
//!
//! Everything else in the crate is built from these plain data types; they
//! carry no behaviour beyond validation.

pub mod ids;
pub mod card;
pub mod binder;
pub mod theme;
pub mod layout;
pub mod config;
pub mod error;

pub use ids::{BinderId, CardId, UserId};
pub use card::{Card, CardPosition, Condition, ImageRef, Rarity};
pub use binder::{find_binder, Binder};
pub use theme::Theme;
pub use layout::{is_valid_layout, GridLayout};
pub use config::BinderConfig;
pub use error::{normalize_backend_error, Error, ErrorKind, NormalizedError, NotFound, ValidationError};
