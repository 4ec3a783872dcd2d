//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{LinkPatch, NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, map_sqlx_error};

const LINK_COLUMNS: &str =
    "code, target_url, owner_id, title, created_at, expires_at, active, click_count";

#[derive(sqlx::FromRow)]
struct LinkRow {
    code: String,
    target_url: String,
    owner_id: String,
    title: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    active: bool,
    click_count: i64,
}

impl From<LinkRow> for ShortLink {
    fn from(r: LinkRow) -> Self {
        ShortLink {
            code: r.code,
            target_url: r.target_url,
            owner_id: r.owner_id,
            title: r.title,
            created_at: r.created_at,
            expires_at: r.expires_at,
            active: r.active,
            click_count: r.click_count,
        }
    }
}

/// PostgreSQL repository for short links.
///
/// Code uniqueness is enforced by the `short_links_code_key` constraint; a
/// violation surfaces as [`AppError::CodeTaken`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM short_links WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            INSERT INTO short_links (code, target_url, owner_id, title, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(&new_link.code)
        .bind(&new_link.target_url)
        .bind(&new_link.owner_id)
        .bind(&new_link.title)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error(e, Some(&new_link.code)))?;

        Ok(row.into())
    }

    async fn update(
        &self,
        code: &str,
        owner_id: &str,
        patch: LinkPatch,
    ) -> Result<ShortLink, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            UPDATE short_links SET
                target_url = COALESCE($3, target_url),
                title = COALESCE($4, title),
                expires_at = CASE WHEN $5 THEN $6 ELSE expires_at END
            WHERE code = $1 AND owner_id = $2 AND active
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(code)
        .bind(owner_id)
        .bind(patch.target_url)
        .bind(patch.title)
        .bind(patch.expires_at.is_some())
        .bind(patch.expires_at.flatten())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ShortLink::from)
            .ok_or_else(|| AppError::not_found("Short link not found"))
    }

    async fn deactivate(&self, code: &str, owner_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE short_links SET active = FALSE WHERE code = $1 AND owner_id = $2 AND active",
        )
        .bind(code)
        .bind(owner_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_click_count(&self, code: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE short_links SET click_count = click_count + 1 WHERE code = $1 AND active")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM short_links WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ShortLink::from).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
