use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::{bearer_token, AdminSession, ApiError, ApiJson};
use crate::auth::{Session, SessionState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<Session>, ApiError> {
    let session = state.auth.sign_in(&req.email, &req.password).await?;
    Ok(Json(session))
}

pub async fn logout(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
) -> Result<StatusCode, ApiError> {
    state.auth.sign_out(&session.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Signed-in session for the presented token, signed-out otherwise.
pub async fn current_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<SessionState> {
    let session = match bearer_token(&headers) {
        Some(token) => state.auth.session(token).await,
        None => None,
    };

    Json(match session {
        Some(session) => SessionState::SignedIn(session),
        None => SessionState::SignedOut,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::api::build_router;
    use axum::http::StatusCode;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_login_logout_cycle() {
        let tmp = TempDir::new().unwrap();
        let state = setup_test_state(&tmp);
        let token = login(&state).await;

        let (status, json) = send(
            build_router(state.clone()),
            "GET",
            "/api/auth/session",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["state"], "signed_in");
        assert_eq!(json["email"], ADMIN_EMAIL);

        let (status, _) = send(
            build_router(state.clone()),
            "POST",
            "/api/auth/logout",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, json) = send(
            build_router(state),
            "GET",
            "/api/auth/session",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(json["state"], "signed_out");
    }

    #[tokio::test]
    async fn test_bad_credentials_are_generic_401() {
        let tmp = TempDir::new().unwrap();
        let state = setup_test_state(&tmp);

        let (status, json) = send(
            build_router(state),
            "POST",
            "/api/auth/login",
            None,
            Some(r#"{"email":"admin@example.com","password":"wrong"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "UNAUTHORIZED");
        assert_eq!(json["error"]["message"], "invalid credentials");
    }

    #[tokio::test]
    async fn test_malformed_login_body_is_400() {
        let tmp = TempDir::new().unwrap();
        let state = setup_test_state(&tmp);

        let (status, json) = send(
            build_router(state),
            "POST",
            "/api/auth/login",
            None,
            Some(r#"{"email":"admin@example.com"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_logout_requires_token() {
        let tmp = TempDir::new().unwrap();
        let state = setup_test_state(&tmp);
        let (status, _) = send(build_router(state), "POST", "/api/auth/logout", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
