//! Sign-in against the hosted identity provider.
//!
//! Authentication itself is the provider's problem; this module only
//! exchanges credentials for a [`Session`] and revokes it again. The
//! session is the explicit context object every user-scoped operation
//! receives, established at sign-in and torn down at sign-out.

mod session;

pub use session::{AuthUser, Session};

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors from identity provider operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider unreachable: {0}")]
    Connection(String),
    #[error("sign-in rejected: {0}")]
    Rejected(String),
    #[error("malformed identity response: {0}")]
    Parse(String),
    #[error("not signed in; run `textlens login <email>` first")]
    SignedOut,
    #[error("session expired; run `textlens login <email>` again")]
    Expired,
}

/// Token grant response format.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    user: AuthUser,
}

/// Error body the provider returns on a failed grant.
#[derive(Debug, Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

/// Client for the hosted identity provider.
pub struct AuthClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl AuthClient {
    /// Create a new client against the service base URL.
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        }
    }

    /// Exchange email and password for a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);

        debug!("signing in {} at {}", email, self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body: ErrorBody = resp.json().await.unwrap_or_default();
            let reason = body
                .error_description
                .or(body.msg)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(AuthError::Rejected(reason));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))?;

        Ok(Session::from_grant(
            token.access_token,
            token.refresh_token,
            token.expires_in.unwrap_or(3600),
            token.user,
        ))
    }

    /// Revoke the session's token. Local teardown happens regardless of
    /// whether the provider accepts the revocation.
    pub async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        let url = format!("{}/auth/v1/logout", self.base_url);

        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AuthError::Rejected(format!("HTTP {}", resp.status())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_deserialization() {
        let json = r#"{
            "access_token": "jwt",
            "refresh_token": "refresh",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": {"id": "user-1", "email": "a@example.com"}
        }"#;

        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "jwt");
        assert_eq!(token.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(token.expires_in, Some(3600));
        assert_eq!(token.user.id, "user-1");
    }

    #[test]
    fn test_token_response_minimal() {
        let json = r#"{"access_token": "jwt", "user": {"id": "user-1"}}"#;

        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert!(token.refresh_token.is_none());
        assert!(token.expires_in.is_none());
        assert!(token.user.email.is_none());
    }

    #[test]
    fn test_error_body_variants() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error_description": "Invalid login credentials"}"#).unwrap();
        assert_eq!(body.error_description.as_deref(), Some("Invalid login credentials"));

        let body: ErrorBody = serde_json::from_str(r#"{"msg": "nope"}"#).unwrap();
        assert_eq!(body.msg.as_deref(), Some("nope"));
    }
}
