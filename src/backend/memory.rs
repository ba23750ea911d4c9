//! In-process reference backend.
//!
//! `MemoryBackend` keeps every binder, account and admin setting in memory
//! and answers the full `BinderBackend` contract. It enforces what the real
//! service enforces about data shape (plan binder limits, complete reorder
//! lists, preset uniqueness) but not access control.
//!
//! For tests it can add latency to every call, fail chosen calls, and count
//! calls by operation name.
//!
//! ```
//! use photocard_binder::backend::{BinderBackend, MemoryBackend, NewCard};
//! use photocard_binder::core::{ImageRef, Theme};
//!
//! # tokio_test_block_on(async {
//! let backend = MemoryBackend::new("user-1");
//! let binder = backend.create_binder("Favourites", &Theme::default()).await.unwrap();
//! backend
//!     .add_photocard(&binder, &NewCard::new("Yuna", ImageRef::from_url("https://blobs.example/y")))
//!     .await
//!     .unwrap();
//!
//! let binders = backend.get_binders().await.unwrap();
//! assert_eq!(binders[0].cards.len(), 1);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use crate::admin::ct::ConstantTime;
use crate::admin::users::filter_users;
use crate::core::{Binder, BinderId, Card, CardId, GridLayout, Theme, UserId};

use super::{
    AdminContentSettings, BackendError, BinderBackend, NewCard, StripeKeys, SubscriptionStatus,
    UserAnalytics, UserProfile,
};

const BINDER_LIMIT_MESSAGE: &str =
    "Binder limit reached. Upgrade your subscription to add more binders.";

/// Deterministic id source.
#[derive(Clone, Debug)]
struct IdGenerator {
    rng: ChaCha8Rng,
}

impl IdGenerator {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn next(&mut self, prefix: &str) -> String {
        format!("{prefix}_{:016x}", self.rng.gen::<u64>())
    }
}

#[derive(Clone, Debug)]
struct Account {
    id: UserId,
    profile: Option<UserProfile>,
    email: Option<String>,
    joined: Option<DateTime<Utc>>,
    status: SubscriptionStatus,
    layout: Option<String>,
}

impl Account {
    fn new(id: UserId) -> Self {
        Self {
            id,
            profile: None,
            email: None,
            joined: Some(Utc::now()),
            status: SubscriptionStatus::Free,
            layout: None,
        }
    }
}

#[derive(Clone, Debug)]
struct StoredBinder {
    owner: UserId,
    binder: Binder,
}

#[derive(Debug)]
struct State {
    caller: UserId,
    accounts: Vec<Account>,
    binders: Vec<StoredBinder>,
    settings: AdminContentSettings,
    master_key: String,
    presets: Vec<GridLayout>,
    default_layout: GridLayout,
    stripe: Option<StripeKeys>,
    ids: IdGenerator,
}

impl State {
    fn account_mut(&mut self, id: &UserId) -> &mut Account {
        let pos = match self.accounts.iter().position(|a| &a.id == id) {
            Some(pos) => pos,
            None => {
                self.accounts.push(Account::new(id.clone()));
                self.accounts.len() - 1
            }
        };
        &mut self.accounts[pos]
    }

    fn caller_account(&mut self) -> &mut Account {
        let caller = self.caller.clone();
        self.account_mut(&caller)
    }

    fn owned_binder_mut(&mut self, id: &BinderId) -> Result<&mut Binder, BackendError> {
        let caller = &self.caller;
        self.binders
            .iter_mut()
            .find(|b| &b.owner == caller && &b.binder.id == id)
            .map(|b| &mut b.binder)
            .ok_or_else(|| BackendError::NotFound(format!("binder {id}")))
    }

    fn binders_of(&self, user: &UserId) -> Vec<Binder> {
        self.binders
            .iter()
            .filter(|b| &b.owner == user)
            .map(|b| b.binder.clone())
            .collect()
    }

    fn analytics(&self) -> Vec<UserAnalytics> {
        self.accounts
            .iter()
            .map(|account| {
                let owned = self.binders.iter().filter(|b| b.owner == account.id);
                let (binder_count, card_count) = owned.fold((0u32, 0u32), |(b, c), stored| {
                    (b + 1, c + stored.binder.cards.len() as u32)
                });
                UserAnalytics {
                    principal: account.id.clone(),
                    email: account.email.clone(),
                    join_date: account.joined,
                    subscription_status: account.status,
                    binder_count,
                    card_count,
                }
            })
            .collect()
    }
}

/// In-memory `BinderBackend`.
#[derive(Debug)]
pub struct MemoryBackend {
    state: Mutex<State>,
    faults: Mutex<FxHashMap<&'static str, VecDeque<BackendError>>>,
    calls: Mutex<FxHashMap<&'static str, usize>>,
    latency: Duration,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryBackend {
    /// Create an empty backend acting for `caller`.
    pub fn new(caller: impl Into<UserId>) -> Self {
        let caller = caller.into();
        let state = State {
            accounts: vec![Account::new(caller.clone())],
            caller,
            binders: Vec::new(),
            settings: AdminContentSettings::default(),
            master_key: String::new(),
            presets: vec![GridLayout::new(3, 3), GridLayout::new(4, 3)],
            default_layout: GridLayout::DEFAULT,
            stripe: None,
            ids: IdGenerator::new(0),
        };
        Self {
            state: Mutex::new(state),
            faults: Mutex::new(FxHashMap::default()),
            calls: Mutex::new(FxHashMap::default()),
            latency: Duration::ZERO,
        }
    }

    /// Seed the id generator.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        lock(&self.state).ids = IdGenerator::new(seed);
        self
    }

    /// Delay every call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Set the master admin key.
    #[must_use]
    pub fn with_master_key(self, key: impl Into<String>) -> Self {
        lock(&self.state).master_key = key.into();
        self
    }

    /// Store a binder owned by the current caller, bypassing plan limits.
    pub fn insert_binder(&self, binder: Binder) {
        let mut state = lock(&self.state);
        let owner = state.caller.clone();
        state.binders.push(StoredBinder { owner, binder });
    }

    /// Register (or update) an account.
    pub fn register_user(
        &self,
        user: impl Into<UserId>,
        email: Option<&str>,
        status: SubscriptionStatus,
    ) {
        let mut state = lock(&self.state);
        let account = state.account_mut(&user.into());
        account.email = email.map(str::to_string);
        account.status = status;
    }

    /// Act as `user` from now on.
    pub fn set_caller(&self, user: impl Into<UserId>) {
        let user = user.into();
        let mut state = lock(&self.state);
        state.account_mut(&user);
        state.caller = user;
    }

    /// Store a raw layout token for the caller, as an older client might have.
    pub fn set_user_layout_token(&self, token: impl Into<String>) {
        lock(&self.state).caller_account().layout = Some(token.into());
    }

    /// Make the next call to `operation` fail with `error`. Queued failures
    /// are consumed in order.
    pub fn fail_next(&self, operation: &'static str, error: BackendError) {
        lock(&self.faults).entry(operation).or_default().push_back(error);
    }

    /// Calls made to `operation` so far, including failed ones.
    #[must_use]
    pub fn call_count(&self, operation: &str) -> usize {
        lock(&self.calls).get(operation).copied().unwrap_or(0)
    }

    /// Snapshot of a binder, whoever owns it.
    #[must_use]
    pub fn binder(&self, id: &BinderId) -> Option<Binder> {
        lock(&self.state)
            .binders
            .iter()
            .find(|b| &b.binder.id == id)
            .map(|b| b.binder.clone())
    }

    /// Stripe keys saved so far.
    #[must_use]
    pub fn stripe_keys(&self) -> Option<StripeKeys> {
        lock(&self.state).stripe.clone()
    }

    async fn enter(&self, operation: &'static str) -> Result<(), BackendError> {
        *lock(&self.calls).entry(operation).or_insert(0) += 1;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let fault = lock(&self.faults).get_mut(operation).and_then(VecDeque::pop_front);
        match fault {
            Some(error) => {
                debug!(operation, error = %error, "injected failure");
                Err(error)
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BinderBackend for MemoryBackend {
    async fn get_binders(&self) -> Result<Vec<Binder>, BackendError> {
        self.enter("getBinders").await?;
        let state = lock(&self.state);
        Ok(state.binders_of(&state.caller))
    }

    async fn create_binder(&self, name: &str, theme: &Theme) -> Result<BinderId, BackendError> {
        self.enter("createBinder").await?;
        let name = name.trim();
        if name.is_empty() {
            return Err(BackendError::Rejected("Binder name is required".to_string()));
        }

        let mut state = lock(&self.state);
        let plan = state.caller_account().status;
        let owned = state.binders.iter().filter(|b| b.owner == state.caller).count();
        if owned >= plan.max_binders() {
            return Err(BackendError::Rejected(BINDER_LIMIT_MESSAGE.to_string()));
        }

        let id = BinderId::new(state.ids.next("binder"));
        let owner = state.caller.clone();
        let binder = Binder::new(id.clone(), name).with_theme(theme.clone());
        state.binders.push(StoredBinder { owner, binder });
        info!(binder = %id, "created binder");
        Ok(id)
    }

    async fn delete_binder(&self, binder: &BinderId) -> Result<(), BackendError> {
        self.enter("deleteBinder").await?;
        let mut state = lock(&self.state);
        let caller = state.caller.clone();
        let before = state.binders.len();
        state
            .binders
            .retain(|b| !(b.owner == caller && &b.binder.id == binder));
        if state.binders.len() == before {
            return Err(BackendError::NotFound(format!("binder {binder}")));
        }
        Ok(())
    }

    async fn add_photocard(&self, binder: &BinderId, card: &NewCard) -> Result<CardId, BackendError> {
        self.enter("addPhotocard").await?;
        let mut state = lock(&self.state);
        let id = CardId::new(state.ids.next("card"));
        let new = Card::new(id.clone(), card.name.clone(), card.image.clone())
            .with_quantity(card.quantity)
            .with_rarity(card.rarity)
            .with_condition(card.condition)
            .with_position(card.position);
        state.owned_binder_mut(binder)?.cards.push(new);
        Ok(id)
    }

    async fn update_photocard(
        &self,
        binder: &BinderId,
        card: &CardId,
        update: &NewCard,
    ) -> Result<(), BackendError> {
        self.enter("updatePhotocard").await?;
        let mut state = lock(&self.state);
        let stored = state
            .owned_binder_mut(binder)?
            .cards
            .iter_mut()
            .find(|c| &c.id == card)
            .ok_or_else(|| BackendError::NotFound(format!("card {card}")))?;
        stored.name = update.name.clone();
        stored.image = update.image.clone();
        stored.position = update.position;
        stored.quantity = update.quantity;
        stored.rarity = update.rarity;
        stored.condition = update.condition;
        Ok(())
    }

    async fn delete_photocard(&self, binder: &BinderId, card: &CardId) -> Result<(), BackendError> {
        self.enter("deletePhotocard").await?;
        let mut state = lock(&self.state);
        let cards = &mut state.owned_binder_mut(binder)?.cards;
        let pos = cards
            .iter()
            .position(|c| &c.id == card)
            .ok_or_else(|| BackendError::NotFound(format!("card {card}")))?;
        cards.remove(pos);
        Ok(())
    }

    async fn update_binder_theme(&self, binder: &BinderId, theme: &Theme) -> Result<(), BackendError> {
        self.enter("updateBinderTheme").await?;
        let mut state = lock(&self.state);
        state.owned_binder_mut(binder)?.theme = theme.clone();
        Ok(())
    }

    async fn reorder_cards(&self, binder: &BinderId, order: &[CardId]) -> Result<(), BackendError> {
        self.enter("reorderCards").await?;
        let mut state = lock(&self.state);
        let stored = state.owned_binder_mut(binder)?;

        let requested: FxHashSet<&CardId> = order.iter().collect();
        let complete = requested.len() == order.len()
            && order.len() == stored.cards.len()
            && stored.cards.iter().all(|c| requested.contains(&c.id));
        if !complete {
            return Err(BackendError::Rejected(
                "New order must list every card exactly once".to_string(),
            ));
        }

        let mut by_id: FxHashMap<CardId, Card> = stored
            .cards
            .drain(..)
            .map(|c| (c.id.clone(), c))
            .collect();
        stored.cards = order.iter().filter_map(|id| by_id.remove(id)).collect();
        debug!(binder = %binder, cards = order.len(), "reordered cards");
        Ok(())
    }

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, BackendError> {
        self.enter("getCallerUserProfile").await?;
        Ok(lock(&self.state).caller_account().profile.clone())
    }

    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<(), BackendError> {
        self.enter("saveCallerUserProfile").await?;
        let mut state = lock(&self.state);
        let account = state.caller_account();
        if profile.email.is_some() {
            account.email = profile.email.clone();
        }
        account.profile = Some(profile.clone());
        Ok(())
    }

    async fn get_subscription_status(&self) -> Result<SubscriptionStatus, BackendError> {
        self.enter("getSubscriptionStatus").await?;
        Ok(lock(&self.state).caller_account().status)
    }

    async fn update_subscription_status(
        &self,
        user: &UserId,
        status: SubscriptionStatus,
    ) -> Result<(), BackendError> {
        self.enter("updateSubscriptionStatus").await?;
        let mut state = lock(&self.state);
        if !state.accounts.iter().any(|a| &a.id == user) {
            return Err(BackendError::NotFound(format!("user {user}")));
        }
        state.account_mut(user).status = status;
        Ok(())
    }

    async fn get_admin_content_settings(&self) -> Result<AdminContentSettings, BackendError> {
        self.enter("getAdminContentSettings").await?;
        Ok(lock(&self.state).settings.clone())
    }

    async fn update_admin_content_settings(
        &self,
        settings: &AdminContentSettings,
    ) -> Result<(), BackendError> {
        self.enter("updateAdminContentSettings").await?;
        lock(&self.state).settings = settings.clone();
        Ok(())
    }

    async fn authenticate_master_admin_key(&self, key: &str) -> Result<bool, BackendError> {
        self.enter("authenticateMasterAdminKey").await?;
        let state = lock(&self.state);
        // an unset key never authenticates
        Ok(!state.master_key.is_empty() && key.ct_eq(state.master_key.as_str()))
    }

    async fn update_master_admin_key(&self, new_key: &str) -> Result<(), BackendError> {
        self.enter("updateMasterAdminKey").await?;
        if new_key.trim().is_empty() {
            return Err(BackendError::Rejected("Master key must not be empty".to_string()));
        }
        lock(&self.state).master_key = new_key.to_string();
        Ok(())
    }

    async fn get_all_users(&self) -> Result<Vec<UserAnalytics>, BackendError> {
        self.enter("getAllUsers").await?;
        Ok(lock(&self.state).analytics())
    }

    async fn get_filtered_users(&self, filter: &str) -> Result<Vec<UserAnalytics>, BackendError> {
        self.enter("getFilteredUsers").await?;
        let users = lock(&self.state).analytics();
        Ok(filter_users(&users, filter).into_iter().cloned().collect())
    }

    async fn get_binders_by_user(&self, user: &UserId) -> Result<Vec<Binder>, BackendError> {
        self.enter("getBindersByUser").await?;
        Ok(lock(&self.state).binders_of(user))
    }

    async fn get_layout_presets(&self) -> Result<Vec<GridLayout>, BackendError> {
        self.enter("getLayoutPresets").await?;
        Ok(lock(&self.state).presets.clone())
    }

    async fn add_layout_preset(&self, layout: &GridLayout) -> Result<(), BackendError> {
        self.enter("addLayoutPreset").await?;
        let mut state = lock(&self.state);
        if state.presets.contains(layout) {
            return Err(BackendError::Rejected(format!("Preset \"{layout}\" already exists")));
        }
        state.presets.push(*layout);
        Ok(())
    }

    async fn remove_layout_preset(&self, layout: &GridLayout) -> Result<(), BackendError> {
        self.enter("removeLayoutPreset").await?;
        let mut state = lock(&self.state);
        let pos = state
            .presets
            .iter()
            .position(|p| p == layout)
            .ok_or_else(|| BackendError::NotFound(format!("layout preset {layout}")))?;
        state.presets.remove(pos);
        Ok(())
    }

    async fn get_default_layout(&self) -> Result<GridLayout, BackendError> {
        self.enter("getDefaultLayout").await?;
        Ok(lock(&self.state).default_layout)
    }

    async fn set_default_layout(&self, layout: &GridLayout) -> Result<(), BackendError> {
        self.enter("setDefaultLayout").await?;
        let mut state = lock(&self.state);
        if !state.presets.contains(layout) {
            return Err(BackendError::Rejected(format!(
                "Preset \"{layout}\" is not in the preset list"
            )));
        }
        state.default_layout = *layout;
        Ok(())
    }

    async fn get_user_layout(&self) -> Result<Option<String>, BackendError> {
        self.enter("getUserLayout").await?;
        Ok(lock(&self.state).caller_account().layout.clone())
    }

    async fn update_user_layout(&self, layout: &GridLayout) -> Result<(), BackendError> {
        self.enter("updateUserLayout").await?;
        lock(&self.state).caller_account().layout = Some(layout.to_string());
        Ok(())
    }

    async fn save_stripe_keys(&self, keys: &StripeKeys) -> Result<(), BackendError> {
        self.enter("saveStripeKeys").await?;
        lock(&self.state).stripe = Some(keys.clone());
        info!("saved stripe keys");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ImageRef;

    fn card(name: &str) -> NewCard {
        NewCard::new(name, ImageRef::from_url(format!("mem://{name}")))
    }

    #[tokio::test]
    async fn test_free_plan_binder_limit() {
        let backend = MemoryBackend::new("u1");
        backend.create_binder("First", &Theme::default()).await.unwrap();

        let err = backend.create_binder("Second", &Theme::default()).await.unwrap_err();
        assert!(err.to_string().contains("Binder limit reached"));

        backend.register_user("u1", None, SubscriptionStatus::Pro);
        backend.create_binder("Second", &Theme::default()).await.unwrap();
        assert_eq!(backend.get_binders().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_deterministic() {
        let a = MemoryBackend::new("u1").with_seed(7);
        let b = MemoryBackend::new("u1").with_seed(7);
        let id_a = a.create_binder("x", &Theme::default()).await.unwrap();
        let id_b = b.create_binder("x", &Theme::default()).await.unwrap();
        assert_eq!(id_a, id_b);
        assert!(id_a.as_str().starts_with("binder_"));
    }

    #[tokio::test]
    async fn test_card_crud_and_reorder() {
        let backend = MemoryBackend::new("u1");
        let binder = backend.create_binder("B", &Theme::default()).await.unwrap();
        let a = backend.add_photocard(&binder, &card("a")).await.unwrap();
        let b = backend.add_photocard(&binder, &card("b")).await.unwrap();
        let c = backend.add_photocard(&binder, &card("c")).await.unwrap();

        backend
            .reorder_cards(&binder, &[c.clone(), a.clone(), b.clone()])
            .await
            .unwrap();
        assert_eq!(backend.binder(&binder).unwrap().card_ids(), vec![c.clone(), a.clone(), b.clone()]);

        backend.delete_photocard(&binder, &a).await.unwrap();
        backend
            .update_photocard(&binder, &b, &card("renamed"))
            .await
            .unwrap();
        let stored = backend.binder(&binder).unwrap();
        assert_eq!(stored.cards.len(), 2);
        assert_eq!(stored.cards[1].name, "renamed");
    }

    #[tokio::test]
    async fn test_incomplete_reorder_rejected() {
        let backend = MemoryBackend::new("u1");
        let binder = backend.create_binder("B", &Theme::default()).await.unwrap();
        let a = backend.add_photocard(&binder, &card("a")).await.unwrap();
        backend.add_photocard(&binder, &card("b")).await.unwrap();

        let result = backend.reorder_cards(&binder, &[a.clone(), a]).await;
        assert!(matches!(result, Err(BackendError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_other_users_binders_hidden() {
        let backend = MemoryBackend::new("u1");
        let binder = backend.create_binder("Mine", &Theme::default()).await.unwrap();

        backend.set_caller("u2");
        assert!(backend.get_binders().await.unwrap().is_empty());
        assert!(backend.delete_binder(&binder).await.is_err());
        assert_eq!(backend.get_binders_by_user(&UserId::new("u1")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_master_key() {
        let backend = MemoryBackend::new("admin").with_master_key("open-sesame");
        assert!(backend.authenticate_master_admin_key("open-sesame").await.unwrap());
        assert!(!backend.authenticate_master_admin_key("open-sesamE").await.unwrap());

        backend.update_master_admin_key("new-key").await.unwrap();
        assert!(!backend.authenticate_master_admin_key("open-sesame").await.unwrap());
        assert!(backend.update_master_admin_key("  ").await.is_err());
    }

    #[tokio::test]
    async fn test_unset_master_key_never_matches() {
        let backend = MemoryBackend::new("admin");
        assert!(!backend.authenticate_master_admin_key("").await.unwrap());
    }

    #[tokio::test]
    async fn test_presets() {
        let backend = MemoryBackend::new("admin");
        let big = GridLayout::new(5, 4);

        assert!(backend.set_default_layout(&big).await.is_err());
        backend.add_layout_preset(&big).await.unwrap();
        assert!(backend.add_layout_preset(&big).await.is_err());
        backend.set_default_layout(&big).await.unwrap();
        assert_eq!(backend.get_default_layout().await.unwrap(), big);

        backend.remove_layout_preset(&big).await.unwrap();
        assert!(matches!(
            backend.remove_layout_preset(&big).await,
            Err(BackendError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_analytics() {
        let backend = MemoryBackend::new("u1");
        backend.register_user("u1", Some("One@Example.com"), SubscriptionStatus::Free);
        backend.register_user("u2", None, SubscriptionStatus::Pro);
        let binder = backend.create_binder("B", &Theme::default()).await.unwrap();
        backend.add_photocard(&binder, &card("a")).await.unwrap();

        let users = backend.get_all_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].binder_count, 1);
        assert_eq!(users[0].card_count, 1);

        let filtered = backend.get_filtered_users(" one@ ").await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].principal, UserId::new("u1"));

        backend
            .update_subscription_status(&UserId::new("u2"), SubscriptionStatus::Free)
            .await
            .unwrap();
        assert!(backend
            .update_subscription_status(&UserId::new("ghost"), SubscriptionStatus::Pro)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_injected_failures_are_consumed() {
        let backend = MemoryBackend::new("u1");
        backend.fail_next("getBinders", BackendError::Transport("down".into()));
        assert!(backend.get_binders().await.is_err());
        assert!(backend.get_binders().await.is_ok());
        assert_eq!(backend.call_count("getBinders"), 2);
    }
}
