use moodyfy::management::{PlaylistStore, SessionManager};
use moodyfy::spotify::{CatalogConfig, SpotifyClient, retry::RetryPolicy};
use moodyfy::types::{PlaylistResult, Session, Track, TrackSource};
use tempfile::tempdir;

fn create_test_playlist() -> PlaylistResult {
    PlaylistResult {
        title: "Rainy Sunday".to_string(),
        description: "Slow songs for slow mornings.".to_string(),
        tracks: vec![Track {
            id: "4R2kfaDFhslZEMJqAFNpdd".to_string(),
            title: "Cardigan".to_string(),
            artist: "Taylor Swift".to_string(),
            uri: "spotify:track:4R2kfaDFhslZEMJqAFNpdd".to_string(),
            album_image: None,
            preview_url: None,
            external_url: "https://open.spotify.com/track/4R2kfaDFhslZEMJqAFNpdd".to_string(),
        }],
        source: TrackSource::Static,
    }
}

fn create_test_session(expires_at: i64) -> Session {
    Session {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        scope: "playlist-modify-public".to_string(),
        expires_at,
    }
}

#[tokio::test]
async fn test_playlist_store_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cache/playlists.json");

    // A missing file is an empty history
    let mut store = PlaylistStore::load_from(&path).await.unwrap();
    assert_eq!(store.count(), 0);

    let index = store.add("rainy sunday", &create_test_playlist());
    assert_eq!(index, 1);
    store.persist().await.unwrap();

    let mut reloaded = PlaylistStore::load_from(&path).await.unwrap();
    assert_eq!(reloaded.count(), 1);

    let record = reloaded.get(1).unwrap();
    assert_eq!(record.mood, "rainy sunday");
    assert_eq!(record.name, "Rainy Sunday");
    assert_eq!(record.tracks.len(), 1);
    assert_eq!(record.spotify_id, None);

    // Indices are 1-based
    assert!(reloaded.get(0).is_none());
    assert!(reloaded.get(2).is_none());

    reloaded.rename(1, "Sunday Coffee").mark_saved(1, "pl123");
    reloaded.persist().await.unwrap();

    let saved = PlaylistStore::load_from(&path).await.unwrap();
    assert_eq!(saved.all()[0].name, "Sunday Coffee");
    assert_eq!(saved.all()[0].spotify_id.as_deref(), Some("pl123"));
}

#[tokio::test]
async fn test_playlist_record_json_shape() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("playlists.json");

    let mut store = PlaylistStore::load_from(&path).await.unwrap();
    store.add("rainy sunday", &create_test_playlist());
    store.persist().await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let track = &json[0]["tracks"][0];

    // Tracks are stored with camelCase keys; absent optionals are omitted
    assert_eq!(
        track["externalUrl"],
        "https://open.spotify.com/track/4R2kfaDFhslZEMJqAFNpdd"
    );
    assert!(track.get("albumImage").is_none());
    assert!(json[0]["created_at"].is_string());
}

#[tokio::test]
async fn test_session_manager_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cache/session.json");

    SessionManager::with_path(create_test_session(i64::MAX), &path)
        .persist()
        .await
        .unwrap();

    let manager = SessionManager::load_from(&path).await.unwrap();
    assert_eq!(manager.current_session(), &create_test_session(i64::MAX));
    assert!(!manager.is_expired());
}

#[tokio::test]
async fn test_session_manager_missing_file() {
    let dir = tempdir().unwrap();
    let result = SessionManager::load_from(dir.path().join("nope.json")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_valid_session_is_not_refreshed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");

    // No credentials: any refresh attempt would fail
    let client = SpotifyClient::new(CatalogConfig {
        api_url: "http://127.0.0.1:9".to_string(),
        token_url: "http://127.0.0.1:9/api/token".to_string(),
        client_id: None,
        client_secret: None,
        retry: RetryPolicy::default(),
    });

    let manager = SessionManager::with_path(create_test_session(i64::MAX), &path)
        .refreshed(&client)
        .await
        .unwrap();
    assert_eq!(manager.current_session().access_token, "access");

    let expired = SessionManager::with_path(create_test_session(0), &path)
        .refreshed(&client)
        .await;
    assert!(expired.is_err());
}
