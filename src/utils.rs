use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub const TRACK_URI_PREFIX: &str = "spotify:track:";
pub const TRACK_URL_PREFIX: &str = "https://open.spotify.com/track/";
pub const SEARCH_URL_PREFIX: &str = "https://open.spotify.com/search/";
pub const DEFAULT_COVER_URL: &str = "https://www.scdn.co/i/_global/twitter_card-default.jpg";

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Opaque value bound to one authorization request.
pub fn generate_state() -> String {
    random_alphanumeric(16)
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Grouping key for artist diversity: the primary credited artist,
/// trimmed and lower-cased.
pub fn normalize_artist(artist: &str) -> String {
    artist
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Whether a uri can be sent to the add-tracks endpoint.
pub fn is_playlist_addable(uri: &str) -> bool {
    uri.starts_with(TRACK_URI_PREFIX) || uri.starts_with(TRACK_URL_PREFIX)
}

fn is_base62(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Converts a playlist-addable uri or web url into a `spotify:track:` uri.
///
/// Returns `None` for empty values, search links, placeholder ids and
/// anything whose id is not base62.
pub fn to_track_uri(uri: &str) -> Option<String> {
    if uri.contains("fallback_") {
        return None;
    }

    let id = if let Some(id) = uri.strip_prefix(TRACK_URI_PREFIX) {
        id
    } else if let Some(rest) = uri.strip_prefix(TRACK_URL_PREFIX) {
        rest.split(['?', '#']).next().unwrap_or_default()
    } else {
        return None;
    };

    if is_base62(id) {
        Some(format!("{}{}", TRACK_URI_PREFIX, id))
    } else {
        None
    }
}

pub fn track_url(id: &str) -> String {
    format!("{}{}", TRACK_URL_PREFIX, id)
}

/// Catalog search link for a title/artist pair that was never resolved.
pub fn search_link(title: &str, artist: &str) -> String {
    let query = format!("{} {}", title, artist);
    format!("{}{}", SEARCH_URL_PREFIX, urlencoding::encode(&query))
}
