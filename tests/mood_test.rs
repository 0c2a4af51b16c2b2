use moodyfy::error::PipelineError;
use moodyfy::mood::{parse_candidates, parse_mood_profile};
use moodyfy::types::TempoPreference;

const MORNING_RUN: &str = r#"{
    "genres": ["dance pop", "electronic", "funk"],
    "artists": ["Dua Lipa", "Daft Punk"],
    "mood_keywords": ["energetic", "bright"],
    "intensity": 8,
    "energy_level": 9,
    "tempo_preference": "fast",
    "playlist_name": "Sunrise Sprint",
    "playlist_description": "Bright, driving songs for an early run."
}"#;

fn assert_upstream_format(result: Result<impl std::fmt::Debug, PipelineError>) {
    match result {
        Err(PipelineError::UpstreamFormat(_)) => {}
        other => panic!("expected UpstreamFormat, got {:?}", other),
    }
}

#[test]
fn test_parse_mood_profile() {
    let profile = parse_mood_profile(MORNING_RUN).unwrap();

    assert_eq!(profile.genres, vec!["dance pop", "electronic", "funk"]);
    assert_eq!(profile.artists, vec!["Dua Lipa", "Daft Punk"]);
    assert_eq!(profile.mood_keywords, vec!["energetic", "bright"]);
    assert_eq!(profile.intensity, 8);
    assert_eq!(profile.energy_level, 9);
    assert_eq!(profile.tempo_preference, TempoPreference::Fast);
    assert_eq!(profile.playlist_name, "Sunrise Sprint");
}

#[test]
fn test_parse_mood_profile_is_lenient_on_optional_fields() {
    let content = r#"{
        "genres": ["ambient"],
        "mood_keywords": ["calm"],
        "intensity": "3",
        "energy_level": 42,
        "tempo_preference": "glacial",
        "playlist_name": "Still Water",
        "playlist_description": "Quiet music."
    }"#;

    let profile = parse_mood_profile(content).unwrap();

    // Missing artists are an empty list
    assert!(profile.artists.is_empty());

    // Numeric strings are accepted, out of range values are clamped
    assert_eq!(profile.intensity, 3);
    assert_eq!(profile.energy_level, 10);

    // Unknown tempo labels fall back to medium
    assert_eq!(profile.tempo_preference, TempoPreference::Medium);
}

#[test]
fn test_parse_mood_profile_defaults_missing_scales() {
    let content = r#"{
        "genres": [],
        "mood_keywords": [],
        "playlist_name": "Untitled Mood",
        "playlist_description": "Something."
    }"#;

    let profile = parse_mood_profile(content).unwrap();
    assert_eq!(profile.intensity, 5);
    assert_eq!(profile.energy_level, 5);
    assert_eq!(profile.tempo_preference, TempoPreference::Medium);
}

#[test]
fn test_parse_mood_profile_rejects_malformed_content() {
    // Empty completion
    assert_upstream_format(parse_mood_profile(""));
    assert_upstream_format(parse_mood_profile("   "));

    // Not JSON, or not an object
    assert_upstream_format(parse_mood_profile("happy vibes"));
    assert_upstream_format(parse_mood_profile("[1, 2, 3]"));

    // genres must be an array
    assert_upstream_format(parse_mood_profile(
        r#"{"genres": "pop", "mood_keywords": [], "playlist_name": "A", "playlist_description": "B"}"#,
    ));

    // mood_keywords must be an array
    assert_upstream_format(parse_mood_profile(
        r#"{"genres": [], "playlist_name": "A", "playlist_description": "B"}"#,
    ));

    // playlist name and description must be non-empty strings
    assert_upstream_format(parse_mood_profile(
        r#"{"genres": [], "mood_keywords": [], "playlist_name": "", "playlist_description": "B"}"#,
    ));
    assert_upstream_format(parse_mood_profile(
        r#"{"genres": [], "mood_keywords": [], "playlist_name": "A", "playlist_description": 7}"#,
    ));
}

#[test]
fn test_parse_candidates() {
    let content = r#"{
        "tracks": [
            {"id": "1", "title": "Levitating", "artist": "Dua Lipa", "album": "Future Nostalgia", "year": 2020, "spotifyUrl": "https://open.spotify.com/track/made-up"},
            {"title": "One More Time", "artist": "Daft Punk", "year": "2000"},
            {"id": 3, "title": "", "artist": "Nobody"},
            {"id": "4", "title": "Untitled"},
            {"id": "5", "title": "Blinding Lights", "artist": "The Weeknd", "album": ""}
        ]
    }"#;

    let suggestions = parse_candidates(content).unwrap();

    // Entries without title or artist are skipped
    assert_eq!(suggestions.len(), 3);

    assert_eq!(suggestions[0].id, "1");
    assert_eq!(suggestions[0].title, "Levitating");
    assert_eq!(suggestions[0].album.as_deref(), Some("Future Nostalgia"));
    assert_eq!(suggestions[0].year, Some(2020));

    // Missing ids are derived from the position
    assert_eq!(suggestions[1].id, "suggestion_1");
    assert_eq!(suggestions[1].year, Some(2000));
    assert_eq!(suggestions[1].album, None);

    assert_eq!(suggestions[2].artist, "The Weeknd");
    assert_eq!(suggestions[2].album, None);
}

#[test]
fn test_parse_candidates_requires_tracks_array() {
    assert_upstream_format(parse_candidates(""));
    assert_upstream_format(parse_candidates(r#"{"songs": []}"#));
    assert_upstream_format(parse_candidates(r#"{"tracks": {"title": "x"}}"#));

    // An empty array is valid
    assert!(parse_candidates(r#"{"tracks": []}"#).unwrap().is_empty());
}
