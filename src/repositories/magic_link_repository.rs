use crate::models::MagicLink;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::{map_unique_violation, RepositoryResult};

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait MagicLinkRepository: Send + Sync {
    /// Marks every unused link for `email` as used. Returns how many were invalidated.
    async fn invalidate_unused(&self, email: &str) -> RepositoryResult<u64>;
    async fn insert(&self, link: &MagicLink) -> RepositoryResult<()>;
    async fn find_unused_by_token(&self, token: &str) -> RepositoryResult<Option<MagicLink>>;
    /// Flips `used` from false to true. Returns false when another caller got there first.
    async fn mark_used(&self, id: &str) -> RepositoryResult<bool>;
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepositoryResult<u64>;
}

pub struct SqliteMagicLinkRepository {
    pool: SqlitePool,
}

impl SqliteMagicLinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MagicLinkRepository for SqliteMagicLinkRepository {
    async fn invalidate_unused(&self, email: &str) -> RepositoryResult<u64> {
        let result = sqlx::query("UPDATE magic_links SET used = 1 WHERE email = ? AND used = 0")
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn insert(&self, link: &MagicLink) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO magic_links (id, email, token, used, remember_me, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&link.id)
        .bind(&link.email)
        .bind(&link.token)
        .bind(link.used)
        .bind(link.remember_me)
        .bind(link.expires_at)
        .bind(link.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_unused_by_token(&self, token: &str) -> RepositoryResult<Option<MagicLink>> {
        let link = sqlx::query_as::<_, MagicLink>(
            r#"
            SELECT id, email, token, used, remember_me, expires_at, created_at
            FROM magic_links
            WHERE token = ? AND used = 0
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }

    async fn mark_used(&self, id: &str) -> RepositoryResult<bool> {
        let result = sqlx::query("UPDATE magic_links SET used = 1 WHERE id = ? AND used = 0")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> RepositoryResult<u64> {
        // Timestamps are stored as RFC 3339 UTC text, so they compare lexically.
        let result = sqlx::query("DELETE FROM magic_links WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
