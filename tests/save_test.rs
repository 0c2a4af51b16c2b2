mod common;

use std::sync::atomic::Ordering;

use common::FakeCatalog;
use moodyfy::error::PipelineError;
use moodyfy::spotify::playlist::{MAX_TRACKS_PER_REQUEST, filter_track_uris, save_playlist};
use moodyfy::types::{SaveOutcome, SaveResponse};

fn uris(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn many_uris(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("spotify:track:track{:04}", i))
        .collect()
}

#[test]
fn test_filter_track_uris() {
    let input = uris(&[
        "spotify:track:7hQJA50XrCWABAu5v6QZ4i",
        "",
        "https://open.spotify.com/track/32OlwWuMpZ6b0aN2RZOeMS?si=xyz",
        "https://open.spotify.com/search/Uptown%20Funk",
        "spotify:track:fallback_3",
    ]);

    assert_eq!(
        filter_track_uris(&input),
        uris(&[
            "spotify:track:7hQJA50XrCWABAu5v6QZ4i",
            "spotify:track:32OlwWuMpZ6b0aN2RZOeMS",
        ])
    );
}

#[tokio::test]
async fn test_save_complete() {
    let catalog = FakeCatalog::default();
    let tracks = many_uris(3);

    let outcome = save_playlist(&catalog, "user", "Sunrise Sprint", "Run!", &tracks)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SaveOutcome::Complete {
            playlist_id: "pl123".to_string(),
            playlist_url: "https://open.spotify.com/playlist/pl123".to_string(),
            added: 3,
        }
    );
    assert_eq!(catalog.added.lock().unwrap().clone(), vec![tracks]);
}

#[tokio::test]
async fn test_save_with_only_invalid_uris_creates_empty_playlist() {
    let catalog = FakeCatalog::default();
    let tracks = uris(&[
        "",
        "https://open.spotify.com/search/Song%20Artist",
        "fallback_1",
    ]);

    let outcome = save_playlist(&catalog, "user", "Links Only", "", &tracks)
        .await
        .unwrap();

    // The playlist exists and the caller learns why it is empty
    assert_eq!(outcome.playlist_id(), "pl123");
    assert_eq!(
        outcome.playlist_url(),
        "https://open.spotify.com/playlist/pl123"
    );
    assert_eq!(
        outcome.warning(),
        Some("No valid track URIs found. Created empty playlist.")
    );
    assert_eq!(catalog.create_calls.load(Ordering::SeqCst), 1);
    assert_eq!(catalog.add_calls.load(Ordering::SeqCst), 0);

    let response = SaveResponse::from(&outcome);
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["playlistId"], "pl123");
    assert_eq!(
        json["playlistUrl"],
        "https://open.spotify.com/playlist/pl123"
    );
    assert!(json["warning"].is_string());
}

#[tokio::test]
async fn test_save_adds_in_chunks() {
    let catalog = FakeCatalog::default();
    let tracks = many_uris(250);

    let outcome = save_playlist(&catalog, "user", "Long", "Long playlist", &tracks)
        .await
        .unwrap();

    let sizes: Vec<usize> = catalog.added.lock().unwrap().iter().map(Vec::len).collect();
    assert_eq!(
        sizes,
        vec![MAX_TRACKS_PER_REQUEST, MAX_TRACKS_PER_REQUEST, 50]
    );
    assert!(matches!(outcome, SaveOutcome::Complete { added: 250, .. }));
}

#[tokio::test]
async fn test_save_reports_failed_chunk() {
    let catalog = FakeCatalog {
        failing_adds: vec![1],
        ..FakeCatalog::default()
    };
    let tracks = many_uris(250);

    let outcome = save_playlist(&catalog, "user", "Long", "Long playlist", &tracks)
        .await
        .unwrap();

    match outcome {
        SaveOutcome::Incomplete {
            added, requested, ..
        } => {
            assert_eq!(added, 150);
            assert_eq!(requested, 250);
        }
        other => panic!("expected Incomplete, got {:?}", other),
    }
    assert_eq!(catalog.add_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_save_reports_skipped_uris() {
    let catalog = FakeCatalog::default();
    let mut tracks = many_uris(2);
    tracks.push("https://open.spotify.com/search/x".to_string());

    let outcome = save_playlist(&catalog, "user", "Mixed", "d", &tracks)
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        SaveOutcome::Incomplete {
            added: 2,
            requested: 3,
            ..
        }
    ));
}

#[tokio::test]
async fn test_save_requires_title() {
    let catalog = FakeCatalog::default();

    let err = save_playlist(&catalog, "user", "  ", "d", &many_uris(1))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::InvalidInput(_)));
    assert_eq!(catalog.create_calls.load(Ordering::SeqCst), 0);
}
