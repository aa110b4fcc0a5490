use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{
    ApiResponse, Comment, CreateCommentRequest, CreatePostRequest, PageQuery, Paginated, Post,
    PostDetail, Success, UpdateCommentRequest, UpdatePostRequest,
};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

/// GET /posts?page=&limit=
pub async fn list_posts_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<ApiResponse<Paginated<Post>>, AppError> {
    let Query(query) = query?;
    let page = state.board_service.list_posts(&query).await?;
    Ok(ApiResponse::ok(page))
}

pub async fn get_post_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<PostDetail>, AppError> {
    let post = state.board_service.get_post(&id).await?;
    Ok(ApiResponse::ok(post))
}

pub async fn create_post_handler(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<ApiResponse<Post>, AppError> {
    let Json(request) = payload?;
    let post = state.board_service.create_post(&user.id, request).await?;
    Ok(ApiResponse::created(post).message("Post created"))
}

pub async fn update_post_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<ApiResponse<Post>, AppError> {
    let Json(request) = payload?;
    let post = state
        .board_service
        .update_post(&id, &user.id, request)
        .await?;
    Ok(ApiResponse::ok(post).message("Post updated"))
}

pub async fn delete_post_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Success>, AppError> {
    state.board_service.delete_post(&id, &user.id).await?;
    Ok(ApiResponse::ok(Success::yes()).message("Post deleted"))
}

/// GET /posts/{post_id}/comments
pub async fn list_comments_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(post_id): Path<String>,
) -> Result<ApiResponse<Vec<Comment>>, AppError> {
    let comments = state.board_service.list_comments(&post_id).await?;
    Ok(ApiResponse::ok(comments))
}

/// POST /posts/{post_id}/comments
pub async fn create_comment_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(post_id): Path<String>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<ApiResponse<Comment>, AppError> {
    let Json(request) = payload?;
    let comment = state
        .board_service
        .add_comment(&post_id, &user.id, request)
        .await?;
    Ok(ApiResponse::created(comment).message("Comment added"))
}

pub async fn update_comment_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCommentRequest>, JsonRejection>,
) -> Result<ApiResponse<Comment>, AppError> {
    let Json(request) = payload?;
    let comment = state
        .board_service
        .update_comment(&id, &user.id, request)
        .await?;
    Ok(ApiResponse::ok(comment).message("Comment updated"))
}

pub async fn delete_comment_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Success>, AppError> {
    state.board_service.delete_comment(&id, &user.id).await?;
    Ok(ApiResponse::ok(Success::yes()).message("Comment deleted"))
}
