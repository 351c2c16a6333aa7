use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Authenticated user context, passed explicitly to whatever needs it
/// instead of living in an ambient singleton.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user_id: Uuid,
    pub display_name: String,
    pub role: Role,
    pub token: Option<String>,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    /// Anonymous browsing session with no token attached.
    pub fn visitor() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            display_name: "visitor".to_string(),
            role: Role::Visitor,
            token: None,
            logged_in_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Visitor,
    Guide,
    Manager,
    Admin,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session payload is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persistence seam for the session object.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, SessionStoreError>;
    async fn save(&self, session: &Session) -> Result<(), SessionStoreError>;
    async fn clear(&self) -> Result<(), SessionStoreError>;
}

/// File-backed session store. A missing file is a normal logged-out state,
/// not an error.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let session = serde_json::from_str(&contents)?;
                debug!("Loaded session from {}", self.path.display());
                Ok(Some(session))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let contents = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&self.path, contents).await?;
        debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
