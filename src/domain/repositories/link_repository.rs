//! Repository trait for short link data access.

use crate::domain::entities::{LinkPatch, NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for short links.
///
/// Lookups by code must see active and inactive links alike, since codes are
/// never reused.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by its exact code, regardless of `active`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Persists a new link.
    ///
    /// Uniqueness of `code` must be enforced by the store itself.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeTaken`] if the code already exists.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Partially updates an active link owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active link matches `code` + `owner_id`.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn update(
        &self,
        code: &str,
        owner_id: &str,
        patch: LinkPatch,
    ) -> Result<ShortLink, AppError>;

    /// Soft-deletes a link by clearing `active`.
    ///
    /// Returns `Ok(true)` if an active link was deactivated, `Ok(false)` if not
    /// found or already inactive.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn deactivate(&self, code: &str, owner_id: &str) -> Result<bool, AppError>;

    /// Increments the denormalized click counter of an active link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment_click_count(&self, code: &str) -> Result<(), AppError>;

    /// Lists all links of an owner, active and inactive, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError>;

    /// Round-trips to the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
