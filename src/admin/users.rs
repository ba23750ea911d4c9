//! User oversight: email matching and the superuser allowlist.

use crate::backend::{BinderBackend, SubscriptionStatus, UserAnalytics};
use crate::core::{Binder, Error, UserId};

use super::AdminPortal;

/// Normalize an email for comparison: trimmed and lowercased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Compare two emails ignoring case and surrounding whitespace.
#[must_use]
pub fn emails_match(a: &str, b: &str) -> bool {
    normalize_email(a) == normalize_email(b)
}

/// Users whose email contains `search`, compared normalized.
///
/// A blank search returns every user. Users without an email never match a
/// non-blank search.
#[must_use]
pub fn filter_users<'a>(users: &'a [UserAnalytics], search: &str) -> Vec<&'a UserAnalytics> {
    let needle = normalize_email(search);
    if needle.is_empty() {
        return users.iter().collect();
    }
    users
        .iter()
        .filter(|user| {
            user.email
                .as_deref()
                .is_some_and(|email| normalize_email(email).contains(&needle))
        })
        .collect()
}

/// Check if `email` is on the superuser allowlist.
#[must_use]
pub fn is_superuser_email(email: Option<&str>, allowlist: &[String]) -> bool {
    match email {
        Some(email) if !email.trim().is_empty() => {
            allowlist.iter().any(|allowed| emails_match(allowed, email))
        }
        _ => false,
    }
}

impl<B: BinderBackend> AdminPortal<B> {
    /// Users matching an email search. Requires an unlocked portal.
    pub async fn users(&mut self, search: &str) -> Result<Vec<UserAnalytics>, Error> {
        self.gate.require_unlocked()?;
        let users = self.backend.get_all_users().await?;
        Ok(filter_users(&users, search).into_iter().cloned().collect())
    }

    /// Change a user's subscription tier.
    pub async fn set_subscription(
        &mut self,
        user: &UserId,
        status: SubscriptionStatus,
    ) -> Result<(), Error> {
        self.gate.require_unlocked()?;
        self.backend.update_subscription_status(user, status).await?;
        Ok(())
    }

    /// A user's binders, for read-only inspection.
    pub async fn user_binders(&mut self, user: &UserId) -> Result<Vec<Binder>, Error> {
        self.gate.require_unlocked()?;
        Ok(self.backend.get_binders_by_user(user).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, email: Option<&str>) -> UserAnalytics {
        UserAnalytics {
            principal: UserId::new(id),
            email: email.map(str::to_string),
            join_date: None,
            subscription_status: SubscriptionStatus::Free,
            binder_count: 0,
            card_count: 0,
        }
    }

    #[test]
    fn test_emails_match() {
        assert!(emails_match("  Admin@Example.COM", "admin@example.com "));
        assert!(!emails_match("a@example.com", "b@example.com"));
    }

    #[test]
    fn test_filter_users() {
        let users = vec![
            user("1", Some("Jisoo@Example.com")),
            user("2", None),
            user("3", Some("rose@example.com")),
        ];

        assert_eq!(filter_users(&users, "").len(), 3);
        assert_eq!(filter_users(&users, "   ").len(), 3);

        let hits = filter_users(&users, " JISOO ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].principal, UserId::new("1"));

        assert_eq!(filter_users(&users, "example").len(), 2);
        assert!(filter_users(&users, "nobody").is_empty());
    }

    #[test]
    fn test_superuser_allowlist() {
        let allowlist = vec!["Owner@Example.com".to_string()];
        assert!(is_superuser_email(Some(" owner@example.com"), &allowlist));
        assert!(!is_superuser_email(Some("guest@example.com"), &allowlist));
        assert!(!is_superuser_email(None, &allowlist));
        assert!(!is_superuser_email(Some(""), &allowlist));
        assert!(!is_superuser_email(Some("owner@example.com"), &[]));
    }
}
