use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::utils;

/// Seconds before the real expiry at which a session counts as expired.
const SESSION_EXPIRY_BUFFER_SECS: i64 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempoPreference {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl TempoPreference {
    /// Lenient parse of a model-provided label; anything unknown is `Medium`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "slow" => TempoPreference::Slow,
            "fast" => TempoPreference::Fast,
            _ => TempoPreference::Medium,
        }
    }

    /// BPM window used to seed catalog recommendations.
    pub fn tempo_range(&self) -> (u32, u32) {
        match self {
            TempoPreference::Slow => (60, 100),
            TempoPreference::Medium => (90, 140),
            TempoPreference::Fast => (130, 180),
        }
    }
}

impl fmt::Display for TempoPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TempoPreference::Slow => "slow",
            TempoPreference::Medium => "medium",
            TempoPreference::Fast => "fast",
        };
        write!(f, "{}", s)
    }
}

/// Structured musical signal derived once per request from the mood text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodProfile {
    pub genres: Vec<String>,
    pub artists: Vec<String>,
    pub mood_keywords: Vec<String>,
    pub intensity: u8,
    pub energy_level: u8,
    pub tempo_preference: TempoPreference,
    pub playlist_name: String,
    pub playlist_description: String,
}

/// An unresolved title/artist pair proposed by the language model.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSuggestion {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub year: Option<u32>,
}

/// A recently played track used as listening context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentTrack {
    pub artist: String,
    pub track: String,
    pub uri: String,
}

/// Canonical output unit of the pipeline.
///
/// The JSON form (camelCase keys) is the shape stored in playlist records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    pub external_url: String,
}

impl Track {
    pub fn is_playlist_addable(&self) -> bool {
        utils::is_playlist_addable(&self.uri)
    }
}

/// Which fallback tier produced a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSource {
    /// Language model suggestions resolved against the catalog.
    Validated,
    /// Unvalidated suggestions pointing at catalog search links.
    SearchLinks,
    /// Catalog-native recommendations.
    Recommended,
    /// The built-in track pool.
    Static,
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrackSource::Validated => "validated suggestions",
            TrackSource::SearchLinks => "unvalidated suggestions (search links)",
            TrackSource::Recommended => "catalog recommendations",
            TrackSource::Static => "built-in fallback pool",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistResult {
    pub title: String,
    pub description: String,
    pub tracks: Vec<Track>,
    pub source: TrackSource,
}

impl PlaylistResult {
    /// The title is the only field a user may change after generation.
    pub fn rename(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn track_uris(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.uri.clone()).collect()
    }
}

/// Knobs for a single `generate` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateParams {
    /// Maximum number of tracks in the result.
    pub length: usize,
    /// Maximum songs per artist (1 = very diverse, 5 = very focused).
    pub diversity: usize,
    /// Minimum popularity (0-100) for catalog recommendations.
    pub popularity: u8,
    /// Use recently played tracks as context; needs a user session.
    pub include_history: bool,
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            length: 20,
            diversity: 2,
            popularity: 50,
            include_history: false,
        }
    }
}

/// Stored record of a generated playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub mood: String,
    pub name: String,
    pub description: String,
    pub tracks: Vec<Track>,
    pub spotify_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub title: String,
    pub artist: String,
    pub link: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub created: String,
    pub name: String,
    pub mood: String,
    pub tracks: usize,
    pub saved: String,
}

/// A user session for the per-user catalog endpoints.
///
/// Sessions are values: refreshing one produces a new `Session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    /// Unix timestamp (seconds) when the access token expires.
    pub expires_at: i64,
}

impl Session {
    /// Builds a session from a token response obtained at `now`.
    ///
    /// Refresh responses may omit the refresh token; the previous one is kept.
    pub fn from_token_response(
        token: TokenResponse,
        previous_refresh_token: Option<&str>,
        now: i64,
    ) -> Self {
        let refresh_token = token
            .refresh_token
            .filter(|t| !t.is_empty())
            .or_else(|| previous_refresh_token.map(str::to_string))
            .unwrap_or_default();

        Session {
            access_token: token.access_token,
            refresh_token,
            scope: token.scope.unwrap_or_default(),
            expires_at: now.saturating_add(i64::try_from(token.expires_in).unwrap_or(i64::MAX)),
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at.saturating_sub(SESSION_EXPIRY_BUFFER_SECS)
    }
}

/// State shared between the `auth` command and its callback handler.
#[derive(Debug, Clone)]
pub struct PendingAuth {
    pub code_verifier: String,
    pub state: String,
    pub session: Option<Session>,
}

/// Result of persisting a playlist to the user's account.
///
/// A partially populated playlist is reported as `Incomplete`, which is
/// still a success: the playlist exists and can be edited by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Complete {
        playlist_id: String,
        playlist_url: String,
        added: usize,
    },
    Incomplete {
        playlist_id: String,
        playlist_url: String,
        added: usize,
        requested: usize,
        warning: String,
    },
}

impl SaveOutcome {
    pub fn playlist_id(&self) -> &str {
        match self {
            SaveOutcome::Complete { playlist_id, .. } => playlist_id,
            SaveOutcome::Incomplete { playlist_id, .. } => playlist_id,
        }
    }

    pub fn playlist_url(&self) -> &str {
        match self {
            SaveOutcome::Complete { playlist_url, .. } => playlist_url,
            SaveOutcome::Incomplete { playlist_url, .. } => playlist_url,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            SaveOutcome::Complete { .. } => None,
            SaveOutcome::Incomplete { warning, .. } => Some(warning),
        }
    }
}

/// Wire form of a [`SaveOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub playlist_id: String,
    pub playlist_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<&SaveOutcome> for SaveResponse {
    fn from(outcome: &SaveOutcome) -> Self {
        SaveResponse {
            playlist_id: outcome.playlist_id().to_string(),
            playlist_url: outcome.playlist_url().to_string(),
            warning: outcome.warning().map(str::to_string),
        }
    }
}

// Spotify Web API payloads.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotifyAlbum {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    #[serde(default)]
    pub album: SpotifyAlbum,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl From<SpotifyTrack> for Track {
    fn from(track: SpotifyTrack) -> Self {
        let artist = track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let external_url = track
            .external_urls
            .spotify
            .unwrap_or_else(|| utils::track_url(&track.id));

        Track {
            album_image: track.album.images.into_iter().next().map(|i| i.url),
            id: track.id,
            title: track.name,
            artist,
            uri: track.uri,
            preview_url: track.preview_url,
            external_url,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub tracks: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistoryItem {
    pub track: SpotifyTrack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentlyPlayedResponse {
    #[serde(default)]
    pub items: Vec<PlayHistoryItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}
