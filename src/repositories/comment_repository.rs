use crate::models::Comment;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::{RepositoryError, RepositoryResult};

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: &Comment) -> RepositoryResult<()>;
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Comment>>;
    /// Oldest first.
    async fn list_by_post(&self, post_id: &str) -> RepositoryResult<Vec<Comment>>;
    async fn update_content(&self, id: &str, content: &str) -> RepositoryResult<Comment>;
    async fn delete(&self, id: &str) -> RepositoryResult<bool>;
}

pub struct SqliteCommentRepository {
    pool: SqlitePool,
}

impl SqliteCommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const COMMENT_COLUMNS: &str = "id, post_id, user_id, author, content, created_at, updated_at";

#[async_trait]
impl CommentRepository for SqliteCommentRepository {
    async fn create(&self, comment: &Comment) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, user_id, author, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&comment.id)
        .bind(&comment.post_id)
        .bind(&comment.user_id)
        .bind(&comment.author)
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE id = ?",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_by_post(&self, post_id: &str) -> RepositoryResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE post_id = ? ORDER BY created_at ASC, rowid ASC",
            COMMENT_COLUMNS
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn update_content(&self, id: &str, content: &str) -> RepositoryResult<Comment> {
        let result = sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
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
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
