use std::path::{Path, PathBuf};

use crate::{spotify::SpotifyClient, types::Session, utils};

/// Keeps the user session in `moodyfy/cache/session.json`.
pub struct SessionManager {
    session: Session,
    path: PathBuf,
}

impl SessionManager {
    pub fn new(session: Session) -> Self {
        Self::with_path(session, Self::session_path())
    }

    pub fn with_path(session: Session, path: impl Into<PathBuf>) -> Self {
        SessionManager {
            session,
            path: path.into(),
        }
    }

    pub async fn load() -> Result<Self, String> {
        Self::load_from(Self::session_path()).await
    }

    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let content = async_fs::read_to_string(path)
            .await
            .map_err(|e| format!("no stored session ({}), run moodyfy auth", e))?;
        let session: Session = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self {
            session,
            path: path.to_path_buf(),
        })
    }

    pub async fn persist(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.session).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }

    pub fn is_expired(&self) -> bool {
        self.session.is_expired(utils::now_timestamp())
    }

    /// Returns a manager holding a usable session, refreshing and persisting
    /// it first if the stored one has expired.
    pub async fn refreshed(self, client: &SpotifyClient) -> Result<Self, String> {
        if !self.is_expired() {
            return Ok(self);
        }

        let session = client
            .refresh_session(&self.session)
            .await
            .map_err(|e| e.to_string())?;
        let manager = Self {
            session,
            path: self.path,
        };
        manager.persist().await?;
        Ok(manager)
    }

    pub fn current_session(&self) -> &Session {
        &self.session
    }

    fn session_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("moodyfy/cache/session.json");
        path
    }
}
