use crate::models::{Post, UpdatePostRequest};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::{RepositoryError, RepositoryResult};

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &Post) -> RepositoryResult<()>;
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Post>>;
    /// Newest first. Returns the page together with the total post count.
    async fn list_page(&self, limit: i64, offset: i64) -> RepositoryResult<(Vec<Post>, i64)>;
    async fn update(&self, id: &str, update: UpdatePostRequest) -> RepositoryResult<Post>;
    async fn delete(&self, id: &str) -> RepositoryResult<bool>;
}

pub struct SqlitePostRepository {
    pool: SqlitePool,
}

impl SqlitePostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str = "id, user_id, title, content, author, image_url, created_at, updated_at";

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn create(&self, post: &Post) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, title, content, author, image_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.id)
        .bind(&post.user_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.author)
        .bind(&post.image_url)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {} FROM posts WHERE id = ?",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn list_page(&self, limit: i64, offset: i64) -> RepositoryResult<(Vec<Post>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {} FROM posts ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
            POST_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((posts, total))
    }

    async fn update(&self, id: &str, update: UpdatePostRequest) -> RepositoryResult<Post> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = COALESCE(?, title),
                content = COALESCE(?, content),
                image_url = NULLIF(COALESCE(?, image_url), ''),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.title)
        .bind(&update.content)
        .bind(&update.image_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
