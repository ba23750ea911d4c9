//! Request and response types of the backend contract.

use std::fmt;
use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Card, CardPosition, Condition, ImageRef, Rarity, UserId};

/// Profile of the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserProfile {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Name to greet the user with.
    #[must_use]
    pub fn shown_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Subscription tier of a user account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Free,
    Pro,
}

impl SubscriptionStatus {
    /// Plan name shown to users.
    #[must_use]
    pub const fn plan_name(self) -> &'static str {
        match self {
            SubscriptionStatus::Free => "Free",
            SubscriptionStatus::Pro => "Subscriber",
        }
    }

    /// Binders an account on this plan may own.
    #[must_use]
    pub const fn max_binders(self) -> usize {
        match self {
            SubscriptionStatus::Free => 1,
            SubscriptionStatus::Pro => 5,
        }
    }
}

/// Global content managed from the admin portal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminContentSettings {
    pub terms_and_conditions: String,
    /// Binder page background replacing every theme's texture.
    #[serde(default)]
    pub background: Option<ImageRef>,
}

/// One row of the admin user overview.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalytics {
    pub principal: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub join_date: Option<DateTime<Utc>>,
    pub subscription_status: SubscriptionStatus,
    pub binder_count: u32,
    pub card_count: u32,
}

impl UserAnalytics {
    /// Join date as shown in the overview, e.g. `Mar 7, 2024`, or `N/A`.
    #[must_use]
    pub fn join_date_label(&self) -> String {
        match self.join_date {
            Some(date) => date.format("%b %-d, %Y").to_string(),
            None => "N/A".to_string(),
        }
    }

    /// Email as shown in the overview.
    #[must_use]
    pub fn email_label(&self) -> &str {
        self.email.as_deref().unwrap_or("No email")
    }
}

/// Card fields sent when adding or updating a photocard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub name: String,
    pub image: ImageRef,
    pub position: CardPosition,
    pub quantity: NonZeroU32,
    pub rarity: Rarity,
    pub condition: Condition,
}

impl NewCard {
    /// A single plain copy at the first slot.
    #[must_use]
    pub fn new(name: impl Into<String>, image: ImageRef) -> Self {
        Self {
            name: name.into(),
            image,
            position: CardPosition::default(),
            quantity: NonZeroU32::MIN,
            rarity: Rarity::None,
            condition: Condition::None,
        }
    }

    #[must_use]
    pub fn with_quantity(mut self, quantity: NonZeroU32) -> Self {
        self.quantity = quantity;
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: CardPosition) -> Self {
        self.position = position;
        self
    }
}

impl From<&Card> for NewCard {
    fn from(card: &Card) -> Self {
        Self {
            name: card.name.clone(),
            image: card.image.clone(),
            position: card.position,
            quantity: card.quantity,
            rarity: card.rarity,
            condition: card.condition,
        }
    }
}

/// Stripe API key pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeKeys {
    pub publishable_key: String,
    pub secret_key: String,
}

impl fmt::Debug for StripeKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeKeys")
            .field("publishable_key", &self.publishable_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
