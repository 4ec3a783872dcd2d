//! Link allocation, management and resolution service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;

use crate::domain::entities::{LinkPatch, NewShortLink, ShortLink, VisitContext};
use crate::domain::repositories::{EventRepository, LinkRepository};
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::slug_validator::{SlugError, validate_code};
use crate::utils::url_normalizer::{derive_title, normalize_url};

use super::TrackingService;

/// Request to allocate a new short link.
#[derive(Debug, Clone, Default)]
pub struct AllocateLink {
    pub target_url: String,
    pub owner_id: String,
    pub custom_code: Option<String>,
    pub title: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of an interactive availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Taken,
    Invalid(SlugError),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Service for allocating, managing and resolving short links.
///
/// Allocation checks for an existing code before inserting, but that check
/// is only a fast path: the store's uniqueness constraint decides, and a
/// conflicting insert is reported as [`AppError::CodeTaken`] exactly like a
/// failed pre-check.
pub struct LinkService<L: LinkRepository + ?Sized, E: EventRepository + ?Sized> {
    repository: Arc<L>,
    tracking: Arc<TrackingService<E>>,
    generator: CodeGenerator,
    public_base_url: String,
}

impl<L: LinkRepository + ?Sized, E: EventRepository + ?Sized> LinkService<L, E> {
    /// Creates a new link service.
    ///
    /// `public_base_url` is the origin short URLs are rendered against.
    pub fn new(
        repository: Arc<L>,
        tracking: Arc<TrackingService<E>>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            tracking,
            generator: CodeGenerator::new(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Allocates a new short link.
    ///
    /// # Steps
    ///
    /// 1. Normalize `target_url`; it must be an absolute http(s) URL
    /// 2. Validate the custom code, or generate candidates strategy by strategy
    /// 3. Reject or skip codes that already exist, active or not
    /// 4. Derive the title from the host if none was given
    /// 5. Persist
    ///
    /// Nothing is written on any failure path.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] for a malformed or non-http(s) target
    /// - [`AppError::Validation`] if the custom code breaks a slug rule
    /// - [`AppError::CodeTaken`] if the custom code exists or loses an insert race
    /// - [`AppError::AllocationExhausted`] if every generated candidate collided
    /// - [`AppError::InvalidRequest`] for an expiry in the past
    pub async fn allocate(&self, request: AllocateLink) -> Result<ShortLink, AppError> {
        let target_url =
            normalize_url(&request.target_url).map_err(|e| AppError::InvalidUrl(e.to_string()))?;

        if let Some(custom) = &request.custom_code {
            validate_code(custom)?;
        }

        ensure_future_expiry(request.expires_at)?;

        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| derive_title(&target_url));

        let new_link = |code: String| NewShortLink {
            code,
            target_url: target_url.clone(),
            owner_id: request.owner_id.clone(),
            title: title.clone(),
            expires_at: request.expires_at,
        };

        let link = match request.custom_code {
            Some(custom) => self.allocate_custom(new_link(custom)).await?,
            None => self.allocate_generated(new_link).await?,
        };

        tracing::info!(code = %link.code, owner_id = %link.owner_id, "link allocated");
        Ok(link)
    }

    async fn allocate_custom(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        if self.repository.find_by_code(&new_link.code).await?.is_some() {
            return Err(AppError::code_taken(new_link.code));
        }

        let link = self.repository.insert(new_link).await?;
        counter!("links_allocated_total", "kind" => "custom").increment(1);
        Ok(link)
    }

    async fn allocate_generated<F>(&self, new_link: F) -> Result<ShortLink, AppError>
    where
        F: Fn(String) -> NewShortLink,
    {
        for (strategy, candidate) in self.generator.candidates() {
            if validate_code(&candidate).is_err() {
                tracing::debug!(strategy = strategy.as_str(), %candidate, "generated code rejected by validator");
                continue;
            }

            if self.repository.find_by_code(&candidate).await?.is_some() {
                counter!("link_code_collisions_total").increment(1);
                tracing::debug!(strategy = strategy.as_str(), %candidate, "generated code already exists");
                continue;
            }

            match self.repository.insert(new_link(candidate)).await {
                Ok(link) => {
                    counter!("links_allocated_total", "kind" => "generated").increment(1);
                    return Ok(link);
                }
                Err(AppError::CodeTaken { code }) => {
                    counter!("link_code_collisions_total").increment(1);
                    tracing::debug!(strategy = strategy.as_str(), %code, "generated code lost insert race");
                }
                Err(e) => return Err(e),
            }
        }

        counter!("link_allocation_exhausted_total").increment(1);
        tracing::error!("every code generation strategy collided");
        Err(AppError::AllocationExhausted)
    }

    /// Reports whether `code` could be allocated right now.
    ///
    /// Read-only and idempotent. Applies the same rules as [`Self::allocate`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn check_availability(&self, code: &str) -> Result<Availability, AppError> {
        if let Err(reason) = validate_code(code) {
            return Ok(Availability::Invalid(reason));
        }

        match self.repository.find_by_code(code).await? {
            Some(_) => Ok(Availability::Taken),
            None => Ok(Availability::Available),
        }
    }

    /// Fetches a link owned by `owner_id`, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist.
    /// Returns [`AppError::Unauthorized`] if another owner holds the code.
    pub async fn get_owned_link(&self, code: &str, owner_id: &str) -> Result<ShortLink, AppError> {
        let link = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found"))?;

        if !link.is_owned_by(owner_id) {
            return Err(AppError::Unauthorized);
        }

        Ok(link)
    }

    /// Lists all links of an owner, newest first.
    pub async fn list_links(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError> {
        self.repository.list_by_owner(owner_id).await
    }

    /// Updates target URL, title or expiry of an owned, active link.
    ///
    /// An empty patch returns the link unchanged.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code does not exist or is inactive
    /// - [`AppError::Unauthorized`] if another owner holds the code
    /// - [`AppError::InvalidUrl`] for an invalid new target
    /// - [`AppError::InvalidRequest`] for an expiry in the past
    pub async fn update_link(
        &self,
        code: &str,
        owner_id: &str,
        mut patch: LinkPatch,
    ) -> Result<ShortLink, AppError> {
        let link = self.get_owned_link(code, owner_id).await?;
        if !link.active {
            return Err(AppError::not_found("Short link not found"));
        }

        if let Some(url) = patch.target_url.take() {
            patch.target_url =
                Some(normalize_url(&url).map_err(|e| AppError::InvalidUrl(e.to_string()))?);
        }

        if let Some(title) = patch.title.take() {
            let title = title.trim();
            if title.is_empty() {
                return Err(AppError::InvalidRequest("title cannot be empty".to_string()));
            }
            patch.title = Some(title.to_string());
        }

        if let Some(expires_at) = patch.expires_at {
            ensure_future_expiry(expires_at)?;
        }

        if patch.is_empty() {
            return Ok(link);
        }

        self.repository.update(code, owner_id, patch).await
    }

    /// Soft-deletes an owned link. The code is never reused.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code does not exist or is already inactive
    /// - [`AppError::Unauthorized`] if another owner holds the code
    pub async fn deactivate_link(&self, code: &str, owner_id: &str) -> Result<(), AppError> {
        let link = self.get_owned_link(code, owner_id).await?;

        if !link.active || !self.repository.deactivate(code, owner_id).await? {
            return Err(AppError::not_found("Short link not found"));
        }

        tracing::info!(%code, %owner_id, "link deactivated");
        Ok(())
    }

    /// Resolves a code for public redirection and records the click.
    ///
    /// The click event and counter update are best effort: a storage failure
    /// there is logged and the redirect still happens.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code does not exist
    /// - [`AppError::Inactive`] if the link was deleted
    /// - [`AppError::Expired`] if the link is past its expiry
    pub async fn resolve(&self, code: &str, ctx: &VisitContext) -> Result<ShortLink, AppError> {
        let outcome = self.resolve_link(code).await;

        let label = match &outcome {
            Ok(_) => "redirect",
            Err(AppError::NotFound(_)) => "not_found",
            Err(AppError::Inactive) => "inactive",
            Err(AppError::Expired) => "expired",
            Err(_) => "error",
        };
        counter!("link_resolutions_total", "outcome" => label).increment(1);

        let link = outcome?;

        if let Err(e) = self.tracking.record_click(&link, ctx).await {
            tracing::warn!(code = %link.code, error = %e, "failed to record click event");
        }

        if let Err(e) = self.repository.increment_click_count(&link.code).await {
            tracing::warn!(code = %link.code, error = %e, "failed to increment click count");
        }

        Ok(link)
    }

    async fn resolve_link(&self, code: &str) -> Result<ShortLink, AppError> {
        let link = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found"))?;

        if !link.active {
            return Err(AppError::Inactive);
        }

        if link.is_expired() {
            return Err(AppError::Expired);
        }

        Ok(link)
    }

    /// Renders the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), code)
    }

    /// Checks that the link store is reachable.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

/// Expiry timestamps, when given, must lie in the future.
fn ensure_future_expiry(expires_at: Option<DateTime<Utc>>) -> Result<(), AppError> {
    match expires_at {
        Some(at) if at <= Utc::now() => Err(AppError::InvalidRequest(
            "expires_at must be in the future".to_string(),
        )),
        _ => Ok(()),
    }
}
