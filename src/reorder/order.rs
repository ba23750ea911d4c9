//! The ordered card list of a binder.
//!
//! Backed by `im::Vector`, so taking a snapshot before a move is O(1) and
//! restoring it is a pointer swap.

use std::ops::Range;

use im::Vector;

use crate::core::{Card, CardId, ValidationError};

/// Binder cards in display order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BinderOrder {
    cards: Vector<Card>,
}

impl BinderOrder {
    #[must_use]
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Cards whose global indices fall in `range`.
    pub fn slice(&self, range: Range<usize>) -> impl Iterator<Item = &Card> {
        let start = range.start.min(self.cards.len());
        let len = range.end.min(self.cards.len()).saturating_sub(start);
        self.cards.iter().skip(start).take(len)
    }

    /// Card ids in order, as sent to the backend.
    #[must_use]
    pub fn ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|card| card.id.clone()).collect()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Card> {
        self.cards.iter().cloned().collect()
    }

    /// Move the card at global index `from` to global index `to`.
    ///
    /// The card is taken out first and then inserted at `to`, so the cards
    /// between the two positions shift by one toward `from`.
    pub fn move_card(&mut self, from: usize, to: usize) -> Result<(), ValidationError> {
        let len = self.cards.len();
        for index in [from, to] {
            if index >= len {
                return Err(ValidationError::SlotOutOfRange { index, len });
            }
        }
        if from != to {
            let card = self.cards.remove(from);
            self.cards.insert(to, card);
        }
        Ok(())
    }

    /// Cheap copy of the current order.
    #[must_use]
    pub fn snapshot(&self) -> Vector<Card> {
        self.cards.clone()
    }

    /// Put back an order taken with [`BinderOrder::snapshot`].
    pub fn restore(&mut self, snapshot: Vector<Card>) {
        self.cards = snapshot;
    }
}

impl From<Vec<Card>> for BinderOrder {
    fn from(cards: Vec<Card>) -> Self {
        Self::new(cards)
    }
}
