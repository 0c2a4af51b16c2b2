use moodyfy::spotify::auth::authorize_url;
use moodyfy::types::{Session, TempoPreference, TokenResponse};
use moodyfy::utils::*;

fn token_response(refresh_token: Option<&str>) -> TokenResponse {
    TokenResponse {
        access_token: "access".to_string(),
        token_type: Some("Bearer".to_string()),
        expires_in: 3600,
        refresh_token: refresh_token.map(str::to_string),
        scope: Some("playlist-modify-public".to_string()),
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    // RFC 7636 appendix B
    let challenge = generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
    assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");

    // Should be base64-encoded (URL-safe, no padding)
    let challenge = generate_code_challenge("test_verifier_123");
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_generate_state() {
    let state = generate_state();
    assert_eq!(state.len(), 16);
    assert_ne!(state, generate_state());
}

#[test]
fn test_authorize_url_carries_pkce_and_state() {
    let url = authorize_url(
        "https://accounts.spotify.com/authorize",
        "client-id",
        "http://127.0.0.1:8888/callback",
        "playlist-modify-public user-read-recently-played",
        "challenge",
        "state123",
    )
    .unwrap();

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let get = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };

    assert_eq!(get("response_type").as_deref(), Some("code"));
    assert_eq!(get("code_challenge_method").as_deref(), Some("S256"));
    assert_eq!(get("code_challenge").as_deref(), Some("challenge"));
    assert_eq!(get("state").as_deref(), Some("state123"));
    assert_eq!(
        get("redirect_uri").as_deref(),
        Some("http://127.0.0.1:8888/callback")
    );
    assert_eq!(
        get("scope").as_deref(),
        Some("playlist-modify-public user-read-recently-played")
    );
}

#[test]
fn test_normalize_artist() {
    assert_eq!(normalize_artist("Daft Punk"), "daft punk");
    assert_eq!(normalize_artist("  Queen "), "queen");

    // Only the primary credited artist counts
    assert_eq!(normalize_artist("Calvin Harris, Dua Lipa"), "calvin harris");
    assert_eq!(normalize_artist(""), "");
}

#[test]
fn test_is_playlist_addable() {
    assert!(is_playlist_addable("spotify:track:7hQJA50XrCWABAu5v6QZ4i"));
    assert!(is_playlist_addable("https://open.spotify.com/track/7hQJA50XrCWABAu5v6QZ4i"));
    assert!(!is_playlist_addable(""));
    assert!(!is_playlist_addable(
        "https://open.spotify.com/search/Don%27t%20Stop%20Me%20Now%20Queen",
    ));
}

#[test]
fn test_to_track_uri() {
    // Already a track uri
    assert_eq!(
        to_track_uri("spotify:track:7hQJA50XrCWABAu5v6QZ4i").as_deref(),
        Some("spotify:track:7hQJA50XrCWABAu5v6QZ4i")
    );

    // Web urls are converted, query and fragment dropped
    assert_eq!(
        to_track_uri("https://open.spotify.com/track/32OlwWuMpZ6b0aN2RZOeMS?si=abc123").as_deref(),
        Some("spotify:track:32OlwWuMpZ6b0aN2RZOeMS")
    );
    assert_eq!(
        to_track_uri("https://open.spotify.com/track/32OlwWuMpZ6b0aN2RZOeMS#x").as_deref(),
        Some("spotify:track:32OlwWuMpZ6b0aN2RZOeMS")
    );

    // Everything else is dropped
    assert_eq!(to_track_uri(""), None);
    assert_eq!(to_track_uri("spotify:track:"), None);
    assert_eq!(to_track_uri("spotify:track:fallback_1"), None);
    assert_eq!(to_track_uri("spotify:track:not-base62!"), None);
    assert_eq!(to_track_uri("spotify:album:7hQJA50XrCWABAu5v6QZ4i"), None);
    assert_eq!(to_track_uri(&search_link("Song", "Artist")), None);
}

#[test]
fn test_search_link() {
    assert_eq!(
        search_link("Don't Stop Me Now", "Queen"),
        "https://open.spotify.com/search/Don%27t%20Stop%20Me%20Now%20Queen"
    );
}

#[test]
fn test_track_url() {
    assert_eq!(
        track_url("7hQJA50XrCWABAu5v6QZ4i"),
        "https://open.spotify.com/track/7hQJA50XrCWABAu5v6QZ4i"
    );
}

#[test]
fn test_session_expiry() {
    let now = 1_700_000_000;
    let session = Session::from_token_response(token_response(Some("refresh")), None, now);

    assert_eq!(session.expires_at, now + 3600);
    assert!(!session.is_expired(now));

    // Expired within the four minute buffer
    assert!(!session.is_expired(now + 3600 - 241));
    assert!(session.is_expired(now + 3600 - 240));
    assert!(session.is_expired(now + 7200));
}

#[test]
fn test_session_expiry_saturates_on_huge_expires_in() {
    let now = 1_700_000_000;
    let token = TokenResponse {
        expires_in: u64::MAX,
        ..token_response(Some("refresh"))
    };
    let session = Session::from_token_response(token, None, now);

    assert_eq!(session.expires_at, i64::MAX);
    assert!(!session.is_expired(now));
}

#[test]
fn test_session_keeps_previous_refresh_token() {
    let now = 1_700_000_000;
    let refreshed = Session::from_token_response(token_response(None), Some("old-refresh"), now);
    assert_eq!(refreshed.refresh_token, "old-refresh");

    let rotated = Session::from_token_response(
        token_response(Some("new-refresh")),
        Some("old-refresh"),
        now,
    );
    assert_eq!(rotated.refresh_token, "new-refresh");
}

#[test]
fn test_tempo_preference() {
    assert_eq!(TempoPreference::from_label("Fast"), TempoPreference::Fast);
    assert_eq!(TempoPreference::from_label(" slow "), TempoPreference::Slow);
    assert_eq!(
        TempoPreference::from_label("medium"),
        TempoPreference::Medium
    );
    assert_eq!(
        TempoPreference::from_label("allegro"),
        TempoPreference::Medium
    );

    assert_eq!(TempoPreference::Slow.tempo_range(), (60, 100));
    assert_eq!(TempoPreference::Medium.tempo_range(), (90, 140));
    assert_eq!(TempoPreference::Fast.tempo_range(), (130, 180));
}
