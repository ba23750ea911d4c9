//! Identifier newtypes.
//!
//! Binders, cards and users are identified by opaque strings assigned by the
//! backend. The crate never parses them; the newtypes only keep a binder id
//! from being passed where a card id is expected.
//!
//! ```
//! use photocard_binder::core::{BinderId, CardId};
//!
//! let binder = BinderId::new("binder-1");
//! let card: CardId = "card-7".into();
//!
//! assert_eq!(binder.as_str(), "binder-1");
//! assert_eq!(card.to_string(), "card-7");
//! ```

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a binder.
    BinderId
);

string_id!(
    /// Identifier of a photocard. Unique across all binders.
    CardId
);

string_id!(
    /// Identifier of a user account (the identity provider's principal).
    UserId
);
