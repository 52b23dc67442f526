//! Admin authentication.
//!
//! An [`AuthProvider`] signs admins in and out and publishes session-state
//! changes. Subscribers see `Unknown` until the first sign-in or sign-out.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

use crate::config::AdminAccount;

/// Authentication errors. Messages stay generic on purpose.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("not signed in")]
    NotSignedIn,
}

/// A signed-in admin session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

/// Session state as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing has happened yet
    #[default]
    Unknown,
    SignedOut,
    SignedIn(Session),
}

/// A live view of session-state changes. Dropping it also unsubscribes.
pub struct SessionSubscription {
    rx: watch::Receiver<SessionState>,
}

impl SessionSubscription {
    /// The latest state.
    pub fn current(&self) -> SessionState {
        self.rx.borrow().clone()
    }

    /// Wait for the next change. `None` once the provider is gone.
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn unsubscribe(self) {}
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;

    /// Look up a live session by token.
    async fn session(&self, token: &str) -> Option<Session>;

    fn subscribe(&self) -> SessionSubscription;
}

/// Hex-encoded SHA-256 of a password.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Sessions held in memory; admins come from the config file.
pub struct LocalAuth {
    admins: Vec<AdminAccount>,
    sessions: RwLock<HashMap<String, Session>>,
    state: watch::Sender<SessionState>,
}

impl LocalAuth {
    pub fn new(admins: Vec<AdminAccount>) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self {
            admins,
            sessions: RwLock::new(HashMap::new()),
            state,
        }
    }

    fn check_credentials(&self, email: &str, password: &str) -> bool {
        let hash = hash_password(password);
        self.admins.iter().any(|a| {
            a.email.eq_ignore_ascii_case(email.trim())
                && a.password_sha256.eq_ignore_ascii_case(&hash)
        })
    }
}

#[async_trait]
impl AuthProvider for LocalAuth {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if !self.check_credentials(email, password) {
            warn!("Failed sign-in for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            token: uuid::Uuid::new_v4().simple().to_string(),
            email: email.trim().to_string(),
            signed_in_at: Utc::now(),
        };
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        self.state.send_replace(SessionState::SignedIn(session.clone()));

        info!("{} signed in", session.email);
        Ok(session)
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let removed = self.sessions.write().await.remove(token);
        match removed {
            Some(session) => {
                self.state.send_replace(SessionState::SignedOut);
                info!("{} signed out", session.email);
                Ok(())
            }
            None => Err(AuthError::NotSignedIn),
        }
    }

    async fn session(&self, token: &str) -> Option<Session> {
        self.sessions.read().await.get(token).cloned()
    }

    fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.state.subscribe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> LocalAuth {
        LocalAuth::new(vec![AdminAccount {
            email: "admin@example.com".to_string(),
            password_sha256: hash_password("secret"),
        }])
    }

    #[test]
    fn test_hash_password() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let auth = provider();
        let session = auth.sign_in("Admin@Example.com", "secret").await.unwrap();
        assert_eq!(auth.session(&session.token).await, Some(session.clone()));

        auth.sign_out(&session.token).await.unwrap();
        assert!(auth.session(&session.token).await.is_none());
        assert_eq!(
            auth.sign_out(&session.token).await,
            Err(AuthError::NotSignedIn)
        );
    }

    #[tokio::test]
    async fn test_wrong_password_is_generic_error() {
        let auth = provider();
        let err = auth.sign_in("admin@example.com", "nope").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(err.to_string(), "invalid credentials");

        let err = auth.sign_in("someone@example.com", "secret").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_subscription_starts_unknown_then_follows_changes() {
        let auth = provider();
        let mut sub = auth.subscribe();
        assert_eq!(sub.current(), SessionState::Unknown);

        let session = auth.sign_in("admin@example.com", "secret").await.unwrap();
        assert_eq!(
            sub.changed().await,
            Some(SessionState::SignedIn(session.clone()))
        );

        auth.sign_out(&session.token).await.unwrap();
        assert_eq!(sub.changed().await, Some(SessionState::SignedOut));

        sub.unsubscribe();
    }

    #[tokio::test]
    async fn test_subscription_ends_with_provider() {
        let auth = provider();
        let mut sub = auth.subscribe();
        drop(auth);
        assert_eq!(sub.changed().await, None);
    }
}
