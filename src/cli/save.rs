use super::{load_session, print_save_response, report_save, spinner};
use crate::{
    config, error, info,
    management::PlaylistStore,
    spotify::{SpotifyClient, playlist::save_playlist},
};

pub async fn save(index: usize, name: Option<String>, json: bool) {
    let mut store = match PlaylistStore::load().await {
        Ok(store) => store,
        Err(e) => error!("Failed to load playlist history. Err: {}", e),
    };

    if let Some(name) = &name {
        store.rename(index, name);
    }

    let record = match store.get(index) {
        Some(record) => record.clone(),
        None => error!(
            "No playlist #{} recorded ({} available), see moodyfy history",
            index,
            store.count()
        ),
    };

    if let Some(id) = &record.spotify_id {
        info!(
            "Playlist #{} was saved before as {}, saving again",
            index,
            id
        );
    }

    let client = SpotifyClient::new(config::catalog_config());
    let session = match load_session(&client).await {
        Some(session) => session,
        None => error!("A user session is required to save playlists, run moodyfy auth"),
    };

    let uris: Vec<String> = record.tracks.iter().map(|t| t.uri.clone()).collect();
    let pb = spinner("Saving playlist to Spotify...");
    let saved = save_playlist(
        &client,
        &session.access_token,
        &record.name,
        &record.description,
        &uris,
    )
    .await;
    pb.finish_and_clear();

    let outcome = match saved {
        Ok(outcome) => outcome,
        Err(e) => error!("Failed to save playlist: {}", e),
    };
    if json {
        print_save_response(&outcome);
    } else {
        report_save(&outcome);
    }

    store.mark_saved(index, outcome.playlist_id());
    if let Err(e) = store.persist().await {
        error!("Failed to update playlist history. Err: {}", e);
    }
}
