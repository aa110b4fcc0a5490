use crate::error::{AppError, Result};
use crate::models::{
    Comment, CreateCommentRequest, CreatePostRequest, PageQuery, Paginated, Post, PostDetail,
    UpdateCommentRequest, UpdatePostRequest, User,
};
use crate::repositories::{new_id, CommentRepository, PostRepository, UserRepository};
use crate::services::{ensure_owner, required_text};
use chrono::Utc;
use std::sync::Arc;

const MAX_TITLE_CHARS: usize = 200;
const MAX_CONTENT_CHARS: usize = 10_000;
const MAX_AUTHOR_CHARS: usize = 50;

/// Posts and comments shared between all users. Anyone signed in can read;
/// only the author can change or remove what they wrote.
pub struct BoardService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
}

impl BoardService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            comments,
            users,
        }
    }

    async fn caller(&self, user_id: &str) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))
    }

    fn author_name(requested: Option<String>, user: &User) -> Result<String> {
        match requested.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => required_text(name, "Author", MAX_AUTHOR_CHARS),
            _ => Ok(user.display_name()),
        }
    }

    async fn existing_post(&self, id: &str) -> Result<Post> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    async fn existing_comment(&self, id: &str) -> Result<Comment> {
        self.comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
    }

    pub async fn list_posts(&self, query: &PageQuery) -> Result<Paginated<Post>> {
        let (page, limit) = query.normalized();
        // Pages past any reachable offset are simply empty.
        let offset = (page - 1).checked_mul(limit).unwrap_or(i64::MAX);
        let (items, total) = self.posts.list_page(limit, offset).await?;
        Ok(Paginated::new(items, total, page, limit))
    }

    pub async fn get_post(&self, id: &str) -> Result<PostDetail> {
        let post = self.existing_post(id).await?;
        let comments = self.comments.list_by_post(&post.id).await?;
        Ok(PostDetail { post, comments })
    }

    pub async fn create_post(&self, user_id: &str, request: CreatePostRequest) -> Result<Post> {
        let user = self.caller(user_id).await?;
        let title = required_text(&request.title, "Title", MAX_TITLE_CHARS)?;
        let content = required_text(&request.content, "Content", MAX_CONTENT_CHARS)?;
        let author = Self::author_name(request.author, &user)?;

        let now = Utc::now();
        let post = Post {
            id: new_id(),
            user_id: user.id.clone(),
            title,
            content,
            author,
            image_url: request
                .image_url
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
            created_at: now,
            updated_at: now,
        };

        self.posts.create(&post).await?;
        tracing::info!("User {} created post {}", user.id, post.id);
        Ok(post)
    }

    pub async fn update_post(
        &self,
        id: &str,
        user_id: &str,
        request: UpdatePostRequest,
    ) -> Result<Post> {
        let post = self.existing_post(id).await?;
        ensure_owner(&post.user_id, user_id, "post")?;

        let update = UpdatePostRequest {
            title: request
                .title
                .map(|t| required_text(&t, "Title", MAX_TITLE_CHARS))
                .transpose()?,
            content: request
                .content
                .map(|c| required_text(&c, "Content", MAX_CONTENT_CHARS))
                .transpose()?,
            image_url: request.image_url.map(|u| u.trim().to_string()),
        };

        Ok(self.posts.update(id, update).await?)
    }

    pub async fn delete_post(&self, id: &str, user_id: &str) -> Result<()> {
        let post = self.existing_post(id).await?;
        ensure_owner(&post.user_id, user_id, "post")?;
        self.posts.delete(id).await?;
        tracing::info!("User {} deleted post {}", user_id, id);
        Ok(())
    }

    pub async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        self.existing_post(post_id).await?;
        Ok(self.comments.list_by_post(post_id).await?)
    }

    pub async fn add_comment(
        &self,
        post_id: &str,
        user_id: &str,
        request: CreateCommentRequest,
    ) -> Result<Comment> {
        self.existing_post(post_id).await?;
        let user = self.caller(user_id).await?;
        let content = required_text(&request.content, "Content", MAX_CONTENT_CHARS)?;
        let author = Self::author_name(request.author, &user)?;

        let now = Utc::now();
        let comment = Comment {
            id: new_id(),
            post_id: post_id.to_string(),
            user_id: user.id.clone(),
            author,
            content,
            created_at: now,
            updated_at: now,
        };

        self.comments.create(&comment).await?;
        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        id: &str,
        user_id: &str,
        request: UpdateCommentRequest,
    ) -> Result<Comment> {
        let comment = self.existing_comment(id).await?;
        ensure_owner(&comment.user_id, user_id, "comment")?;
        let content = required_text(&request.content, "Content", MAX_CONTENT_CHARS)?;
        Ok(self.comments.update_content(id, &content).await?)
    }

    pub async fn delete_comment(&self, id: &str, user_id: &str) -> Result<()> {
        let comment = self.existing_comment(id).await?;
        ensure_owner(&comment.user_id, user_id, "comment")?;
        self.comments.delete(id).await?;
        Ok(())
    }
}
