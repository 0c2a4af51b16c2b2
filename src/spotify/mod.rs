//! # Spotify Integration Module
//!
//! Everything that talks to the Spotify Web API lives here. The pipeline
//! depends on the [`Catalog`] trait only; [`SpotifyClient`] is the HTTP
//! implementation.
//!
//! ## Credentials
//!
//! Two kinds of tokens are in play:
//!
//! - an **app token** from the client credentials flow, used for search and
//!   recommendations. Every pipeline invocation obtains its own.
//! - a **user session** ([`crate::types::Session`]) from the authorization
//!   code flow, required for profile lookup, listening history and playlist
//!   changes. Sessions are passed explicitly into every call.
//!
//! ## Rate Limiting
//!
//! The token exchange and track search call sites retry `429` responses with
//! exponential backoff ([`retry::send_with_retry`]). Other endpoints report a
//! non-success status as [`PipelineError::CatalogRequestFailed`].
//!
//! ## API Coverage
//!
//! - `POST /api/token` - client credentials, authorization code, refresh
//! - `GET /search` - track lookup by title and artist
//! - `GET /recommendations` - catalog-native recommendations
//! - `GET /me` - user profile
//! - `GET /me/player/recently-played` - listening history
//! - `POST /users/{user_id}/playlists` - create playlist
//! - `POST /playlists/{playlist_id}/tracks` - add tracks

pub mod auth;
mod client;
pub mod playlist;
pub mod retry;

use async_trait::async_trait;

use crate::{
    error::PipelineError,
    types::{CreatePlaylistResponse, RecentTrack, Track, UserProfile},
};

pub use client::SpotifyClient;

/// Endpoints and credentials of the catalog service.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Web API base URL, e.g. `https://api.spotify.com/v1`.
    pub api_url: String,
    /// Accounts token endpoint.
    pub token_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub retry: retry::RetryPolicy,
}

/// Parameters for the recommendations endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationQuery {
    pub seed_genres: Vec<String>,
    pub limit: u32,
    /// 0.0 - 1.0
    pub target_energy: f32,
    pub min_popularity: u8,
    pub min_tempo: u32,
    pub max_tempo: u32,
}

impl RecommendationQuery {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("seed_genres", self.seed_genres.join(",")),
            ("limit", self.limit.to_string()),
            ("target_energy", format!("{:.1}", self.target_energy)),
            ("min_popularity", self.min_popularity.to_string()),
            ("min_tempo", self.min_tempo.to_string()),
            ("max_tempo", self.max_tempo.to_string()),
        ]
    }
}

/// The catalog operations the pipeline and the save stage rely on.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// App access token from the client credentials flow.
    async fn app_token(&self) -> Result<String, PipelineError>;

    /// Top search result for a title/artist pair, `None` if nothing matched.
    async fn search_track(
        &self,
        token: &str,
        title: &str,
        artist: &str,
    ) -> Result<Option<Track>, PipelineError>;

    async fn recommendations(
        &self,
        token: &str,
        query: &RecommendationQuery,
    ) -> Result<Vec<Track>, PipelineError>;

    async fn current_user(&self, user_token: &str) -> Result<UserProfile, PipelineError>;

    async fn recently_played(
        &self,
        user_token: &str,
        limit: u32,
    ) -> Result<Vec<RecentTrack>, PipelineError>;

    async fn create_playlist(
        &self,
        user_token: &str,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<CreatePlaylistResponse, PipelineError>;

    async fn add_tracks(
        &self,
        user_token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), PipelineError>;
}
