//! The session context and its on-disk lifecycle.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Identity of the signed-in user, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// An established session: user identity plus the access credential.
///
/// Passed explicitly to every component that acts on the user's behalf.
/// Persisted between invocations under the data directory; removed at
/// sign-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

impl Session {
    /// Build a session from a token grant.
    pub fn from_grant(
        access_token: String,
        refresh_token: Option<String>,
        expires_in_secs: i64,
        user: AuthUser,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
            user,
        }
    }

    /// Owning user's id.
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// Whether the access credential has lapsed.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Load a persisted session. None when absent or unreadable.
    pub fn load(path: &Path) -> Option<Self> {
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!("ignoring unreadable session file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Persist the session.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }

    /// Tear down the persisted session. Absent file is fine.
    pub fn remove(path: &Path) -> std::io::Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
