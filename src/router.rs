use crate::{auth, config::ConfigError, config::ServerConfig, handlers, middleware, AppState};
use axum::{
    http::{header, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the full HTTP surface. Everything except health and the two
/// magic-link endpoints sits behind the bearer-token check.
pub fn build_router(state: AppState, config: &ServerConfig) -> Result<Router, ConfigError> {
    let public = Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/auth/magic-link",
            post(handlers::request_magic_link_handler),
        )
        .route("/auth/verify", get(handlers::verify_magic_link_handler));

    let protected = Router::new()
        .route("/auth/refresh", post(handlers::refresh_token_handler))
        .route("/auth/logout", post(handlers::logout_handler))
        .route(
            "/users/me",
            get(handlers::get_profile_handler).put(handlers::update_profile_handler),
        )
        .route(
            "/routines",
            get(handlers::list_routines_handler).post(handlers::create_routine_handler),
        )
        .route(
            "/routines/{id}",
            get(handlers::get_routine_handler)
                .put(handlers::update_routine_handler)
                .delete(handlers::delete_routine_handler),
        )
        .route(
            "/routines/{id}/exercises",
            get(handlers::list_exercises_handler).post(handlers::create_exercise_handler),
        )
        .route(
            "/exercises/{id}",
            get(handlers::get_exercise_handler)
                .put(handlers::update_exercise_handler)
                .delete(handlers::delete_exercise_handler),
        )
        .route(
            "/workout-records",
            get(handlers::list_workout_records_handler)
                .post(handlers::create_workout_record_handler),
        )
        .route(
            "/workout-records/{id}",
            get(handlers::get_workout_record_handler)
                .delete(handlers::delete_workout_record_handler),
        )
        .route(
            "/posts",
            get(handlers::list_posts_handler).post(handlers::create_post_handler),
        )
        .route(
            "/posts/{id}",
            get(handlers::get_post_handler)
                .put(handlers::update_post_handler)
                .delete(handlers::delete_post_handler),
        )
        .route(
            "/posts/{id}/comments",
            get(handlers::list_comments_handler).post(handlers::create_comment_handler),
        )
        .route(
            "/comments/{id}",
            put(handlers::update_comment_handler).delete(handlers::delete_comment_handler),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    let cors_layer = CorsLayer::new()
        .allow_origin(config.cors_origin_header()?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    Ok(Router::new()
        .merge(public)
        .merge(protected)
        .layer(axum_middleware::from_fn_with_state(
            config.is_production(),
            middleware::add_security_headers,
        ))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
