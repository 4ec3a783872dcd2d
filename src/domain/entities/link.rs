//! Short link entity.

use chrono::{DateTime, Utc};

/// A short code mapped to a target URL and owned by a single user.
///
/// Links are never physically removed: deletion clears `active`, and the
/// code stays reserved forever so a stale external link cannot silently
/// start pointing somewhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLink {
    pub code: String,
    pub target_url: String,
    pub owner_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub click_count: i64,
}

impl ShortLink {
    /// Returns true if the link has passed its expiry time at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if `owner_id` owns this link.
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }
}

/// Input data for persisting a freshly allocated link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortLink {
    pub code: String,
    pub target_url: String,
    pub owner_id: String,
    pub title: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub target_url: Option<String>,
    pub title: Option<String>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self.target_url.is_none() && self.title.is_none() && self.expires_at.is_none()
    }

    /// Applies the patch to a link in place.
    pub fn apply_to(&self, link: &mut ShortLink) {
        if let Some(url) = &self.target_url {
            link.target_url = url.clone();
        }
        if let Some(title) = &self.title {
            link.title = title.clone();
        }
        if let Some(expires_at) = self.expires_at {
            link.expires_at = expires_at;
        }
    }
}
