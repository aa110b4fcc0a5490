use crate::models::ApiResponse;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// GET /health
pub async fn health_handler() -> ApiResponse<Health> {
    ApiResponse::ok(Health { status: "ok" })
}
