use tabled::Table;

use super::{load_session, report_save, spinner};
use crate::{
    config, error, info,
    management::PlaylistStore,
    pipeline::{PipelineOptions, generate_playlist},
    spotify::{SpotifyClient, playlist::save_playlist},
    success,
    types::{GenerateParams, PlaylistResult, TrackSource, TrackTableRow},
    warning,
};

pub async fn generate(mood: String, params: GenerateParams, save: bool, name: Option<String>) {
    let model = match config::language_model() {
        Ok(model) => model,
        Err(e) => error!("{}", e),
    };
    let client = SpotifyClient::new(config::catalog_config());

    let session = if params.include_history || save {
        load_session(&client).await
    } else {
        None
    };

    let pb = spinner("Generating playlist...");
    let result = generate_playlist(
        &model,
        &client,
        &mood,
        &params,
        session.as_ref(),
        &PipelineOptions::default(),
    )
    .await;
    pb.finish_and_clear();

    let mut playlist = match result {
        Ok(playlist) => playlist,
        Err(e) if e.is_mood_analysis_failure() => {
            error!("Could not make sense of that mood, try describing it differently. Err: {}", e)
        }
        Err(e) => error!("{}", e),
    };
    if let Some(name) = name {
        playlist.rename(name);
    }

    print_playlist(&playlist);

    let mut store = match PlaylistStore::load().await {
        Ok(store) => store,
        Err(e) => error!("Failed to load playlist history. Err: {}", e),
    };
    let index = store.add(&mood, &playlist);

    if save {
        match session {
            Some(session) => {
                let pb = spinner("Saving playlist to Spotify...");
                let saved = save_playlist(
                    &client,
                    &session.access_token,
                    &playlist.title,
                    &playlist.description,
                    &playlist.track_uris(),
                )
                .await;
                pb.finish_and_clear();

                match saved {
                    Ok(outcome) => {
                        report_save(&outcome);
                        store.mark_saved(index, outcome.playlist_id());
                    }
                    Err(e) => warning!("Failed to save playlist: {}", e),
                }
            }
            None => warning!("Not saving: no user session available"),
        }
    }

    if let Err(e) = store.persist().await {
        error!("Failed to record playlist. Err: {}", e);
    }
    success!("Recorded as playlist #{}", index);
}

fn print_playlist(playlist: &PlaylistResult) {
    info!("{} ({})", playlist.title, playlist.source);
    println!("{}\n", playlist.description);

    let rows: Vec<TrackTableRow> = playlist
        .tracks
        .iter()
        .enumerate()
        .map(|(i, track)| TrackTableRow {
            position: i + 1,
            title: track.title.clone(),
            artist: track.artist.clone(),
            link: track.external_url.clone(),
        })
        .collect();
    println!("{}", Table::new(rows));

    if playlist.source == TrackSource::SearchLinks {
        warning!("These tracks could not be checked against Spotify and cannot be saved");
    }
}
