//! Binders: named, themed, ordered card collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::card::Card;
use super::error::NotFound;
use super::ids::{BinderId, CardId};
use super::theme::Theme;

/// A binder as returned by the backend.
///
/// `cards` is authoritative for display order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binder {
    pub id: BinderId,
    pub name: String,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub theme: Theme,
}

impl Binder {
    /// Create an empty binder with the default theme.
    #[must_use]
    pub fn new(id: impl Into<BinderId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created: Utc::now(),
            cards: Vec::new(),
            theme: Theme::default(),
        }
    }

    /// Replace the theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Replace the card list.
    #[must_use]
    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = cards;
        self
    }

    /// Look up a card by id.
    #[must_use]
    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    /// Look up a card by id, reporting a missing card as `NotFound`.
    pub fn require_card(&self, id: &CardId) -> Result<&Card, NotFound> {
        self.card(id).ok_or_else(|| NotFound::Card(id.clone()))
    }

    /// Card ids in display order.
    #[must_use]
    pub fn card_ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|c| c.id.clone()).collect()
    }

    /// Total copies across all cards.
    #[must_use]
    pub fn total_copies(&self) -> u64 {
        self.cards.iter().map(|c| u64::from(c.quantity.get())).sum()
    }
}

/// Find a binder in a fetched set, reporting a missing binder as `NotFound`.
pub fn find_binder<'a>(binders: &'a [Binder], id: &BinderId) -> Result<&'a Binder, NotFound> {
    binders
        .iter()
        .find(|b| &b.id == id)
        .ok_or_else(|| NotFound::Binder(id.clone()))
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::core::card::ImageRef;

    fn binder() -> Binder {
        let cards = (0..3)
            .map(|i| {
                Card::new(format!("c{i}"), format!("Card {i}"), ImageRef::from_url("u"))
                    .with_quantity(NonZeroU32::new(i + 1).unwrap())
            })
            .collect();
        Binder::new("b1", "Main").with_cards(cards)
    }

    #[test]
    fn test_card_lookup() {
        let b = binder();
        assert_eq!(b.card(&CardId::new("c1")).map(|c| c.name.as_str()), Some("Card 1"));
        assert_eq!(
            b.require_card(&CardId::new("zz")),
            Err(NotFound::Card(CardId::new("zz")))
        );
    }

    #[test]
    fn test_card_ids_in_order() {
        let ids = binder().card_ids();
        assert_eq!(ids, vec![CardId::new("c0"), CardId::new("c1"), CardId::new("c2")]);
    }

    #[test]
    fn test_total_copies() {
        assert_eq!(binder().total_copies(), 6);
    }

    #[test]
    fn test_find_binder() {
        let binders = vec![binder()];
        assert!(find_binder(&binders, &BinderId::new("b1")).is_ok());
        assert_eq!(
            find_binder(&binders, &BinderId::new("nope")).unwrap_err(),
            NotFound::Binder(BinderId::new("nope"))
        );
    }
}
