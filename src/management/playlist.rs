use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::types::{PlaylistRecord, PlaylistResult};

/// Local history of generated playlists, newest last.
pub struct PlaylistStore {
    records: Vec<PlaylistRecord>,
    path: PathBuf,
}

impl PlaylistStore {
    pub async fn load() -> Result<Self, String> {
        Self::load_from(Self::store_path()).await
    }

    /// Loads the store at `path`; a missing file is an empty history.
    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Ok(Self {
                records: Vec::new(),
                path,
            });
        }

        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let records: Vec<PlaylistRecord> =
            serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { records, path })
    }

    pub async fn persist(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.records).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }

    /// Records a generated playlist and returns its 1-based index.
    pub fn add(&mut self, mood: &str, playlist: &PlaylistResult) -> usize {
        self.records.push(PlaylistRecord {
            mood: mood.to_string(),
            name: playlist.title.clone(),
            description: playlist.description.clone(),
            tracks: playlist.tracks.clone(),
            spotify_id: None,
            created_at: Utc::now(),
        });
        self.records.len()
    }

    /// Record by 1-based index, as shown by `moodyfy history`.
    pub fn get(&self, index: usize) -> Option<&PlaylistRecord> {
        index.checked_sub(1).and_then(|i| self.records.get(i))
    }

    pub fn mark_saved(&mut self, index: usize, spotify_id: &str) -> &mut Self {
        if let Some(record) = index.checked_sub(1).and_then(|i| self.records.get_mut(i)) {
            record.spotify_id = Some(spotify_id.to_string());
        }
        self
    }

    pub fn rename(&mut self, index: usize, name: &str) -> &mut Self {
        if let Some(record) = index.checked_sub(1).and_then(|i| self.records.get_mut(i)) {
            record.name = name.to_string();
        }
        self
    }

    pub fn all(&self) -> &[PlaylistRecord] {
        &self.records
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    fn store_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("moodyfy/cache/playlists.json");
        path
    }
}
