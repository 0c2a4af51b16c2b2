#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use moodyfy::{
    error::PipelineError,
    llm::LanguageModel,
    spotify::{Catalog, RecommendationQuery},
    types::{CreatePlaylistResponse, ExternalUrls, RecentTrack, Track, UserProfile},
};
use tokio::time::Instant;

pub fn create_test_track(id: &str, title: &str, artist: &str) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
        uri: format!("spotify:track:{}", id),
        album_image: None,
        preview_url: None,
        external_url: format!("https://open.spotify.com/track/{}", id),
    }
}

/// Replays canned completions in order.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String, PipelineError>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<Result<String, PipelineError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete_json(&self, _system: &str, user: &str) -> Result<String, PipelineError> {
        self.prompts.lock().unwrap().push(user.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

/// In-memory catalog that counts every call.
#[derive(Default)]
pub struct FakeCatalog {
    /// Search results keyed by lower-cased title.
    pub known: HashMap<String, Track>,
    pub token_fails: bool,
    /// Search titles (lower-cased) answered with a 500.
    pub failing_searches: Vec<String>,
    pub recommended: Vec<Track>,
    pub recommendations_status: Option<u16>,
    pub recent: Vec<RecentTrack>,
    /// Add-tracks calls failing with a 502, by call number (0-based).
    pub failing_adds: Vec<usize>,

    pub token_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub search_times: Mutex<Vec<Instant>>,
    pub recommendation_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub add_calls: AtomicUsize,
    pub added: Mutex<Vec<Vec<String>>>,
    pub last_query: Mutex<Option<RecommendationQuery>>,
}

impl FakeCatalog {
    pub fn with_known(tracks: &[Track]) -> Self {
        Self {
            known: tracks
                .iter()
                .map(|t| (t.title.to_lowercase(), t.clone()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn total_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
            + self.search_calls.load(Ordering::SeqCst)
            + self.recommendation_calls.load(Ordering::SeqCst)
            + self.history_calls.load(Ordering::SeqCst)
            + self.create_calls.load(Ordering::SeqCst)
            + self.add_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn app_token(&self) -> Result<String, PipelineError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        if self.token_fails {
            Err(PipelineError::CredentialMissing("SPOTIFY_CLIENT_ID"))
        } else {
            Ok("app-token".to_string())
        }
    }

    async fn search_track(
        &self,
        _token: &str,
        title: &str,
        _artist: &str,
    ) -> Result<Option<Track>, PipelineError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.search_times.lock().unwrap().push(Instant::now());
        let key = title.to_lowercase();
        if self.failing_searches.contains(&key) {
            return Err(PipelineError::catalog(500, "track search"));
        }
        Ok(self.known.get(&key).cloned())
    }

    async fn recommendations(
        &self,
        _token: &str,
        query: &RecommendationQuery,
    ) -> Result<Vec<Track>, PipelineError> {
        self.recommendation_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        match self.recommendations_status {
            Some(status) => Err(PipelineError::catalog(status, "recommendations")),
            None => Ok(self.recommended.clone()),
        }
    }

    async fn current_user(&self, _user_token: &str) -> Result<UserProfile, PipelineError> {
        Ok(UserProfile {
            id: "listener".to_string(),
            display_name: None,
        })
    }

    async fn recently_played(
        &self,
        _user_token: &str,
        limit: u32,
    ) -> Result<Vec<RecentTrack>, PipelineError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.recent.iter().take(limit as usize).cloned().collect())
    }

    async fn create_playlist(
        &self,
        _user_token: &str,
        _user_id: &str,
        _name: &str,
        _description: &str,
    ) -> Result<CreatePlaylistResponse, PipelineError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Ok(CreatePlaylistResponse {
            id: "pl123".to_string(),
            external_urls: ExternalUrls {
                spotify: Some("https://open.spotify.com/playlist/pl123".to_string()),
            },
        })
    }

    async fn add_tracks(
        &self,
        _user_token: &str,
        _playlist_id: &str,
        uris: &[String],
    ) -> Result<(), PipelineError> {
        let call = self.add_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_adds.contains(&call) {
            return Err(PipelineError::catalog(502, "add tracks"));
        }
        self.added.lock().unwrap().push(uris.to_vec());
        Ok(())
    }
}
