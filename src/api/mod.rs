//! REST API endpoints.
//!
//! Axum-based HTTP API serving the public league dashboard and the
//! token-protected admin panel.

pub mod routes;
pub mod state;
pub mod views;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts},
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{AuthError, Session};
use crate::forms::FormError;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { collection, id } => {
                ApiError::NotFound(format!("{} {}", collection, id))
            }
            other => {
                tracing::error!("Store operation failed: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl From<FormError> for ApiError {
    fn from(e: FormError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Unauthorized(e.to_string())
    }
}

/// JSON request body. Malformed bodies are rejected with the API error body
/// and status 400.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// The token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// A signed-in admin; rejects the request with 401 otherwise.
pub struct AdminSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized(AuthError::NotSignedIn.to_string()))?;

        state
            .auth
            .session(token)
            .await
            .map(AdminSession)
            .ok_or_else(|| ApiError::Unauthorized(AuthError::NotSignedIn.to_string()))
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin {
        "*" => layer.allow_origin(Any),
        other => match HeaderValue::from_str(other) {
            Ok(value) => layer.allow_origin(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", other);
                layer
            }
        },
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/health", get(health))
        // Public dashboard
        .route("/api/leagues", get(routes::public::list_leagues))
        .route("/api/leagues/:id", get(routes::public::get_league))
        .route("/api/leagues/:id/matches", get(routes::public::league_matches))
        .route("/api/leagues/:id/ranking", get(routes::public::league_ranking))
        .route(
            "/api/leagues/:id/players/:player_id/stats",
            get(routes::public::player_detail),
        )
        // Auth
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/auth/session", get(routes::auth::current_session))
        // Admin
        .route(
            "/api/admin/players",
            get(routes::admin::list_players).post(routes::admin::create_player),
        )
        .route(
            "/api/admin/players/:id",
            put(routes::admin::update_player).delete(routes::admin::delete_player),
        )
        .route(
            "/api/admin/players/:id/stats",
            get(routes::admin::player_breakdown),
        )
        .route(
            "/api/admin/clubs",
            get(routes::admin::list_clubs).post(routes::admin::create_club),
        )
        .route(
            "/api/admin/clubs/:id",
            axum::routing::delete(routes::admin::delete_club),
        )
        .route(
            "/api/admin/matches",
            get(routes::admin::list_matches).post(routes::admin::create_match),
        )
        .route(
            "/api/admin/matches/:id",
            get(routes::admin::get_match)
                .put(routes::admin::update_match)
                .delete(routes::admin::delete_match),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
