use super::Catalog;
use crate::{
    error::PipelineError,
    info,
    types::SaveOutcome,
    utils::{self, to_track_uri},
    warning,
};

/// Upper bound of uris per add-tracks request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

const DEFAULT_DESCRIPTION: &str = "Generated by moodyfy";
const EMPTY_PLAYLIST_WARNING: &str = "No valid track URIs found. Created empty playlist.";

/// Keeps the uris that can be added to a playlist, normalized to
/// `spotify:track:` form, in their original order.
pub fn filter_track_uris(uris: &[String]) -> Vec<String> {
    uris.iter().filter_map(|u| to_track_uri(u)).collect()
}

fn playlist_url(id: &str, external: Option<String>) -> String {
    external.unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", id))
}

/// Creates a playlist on the user's account and adds the given tracks.
///
/// Search links, placeholder ids and malformed uris are dropped before any
/// add request. The playlist is created even when nothing is left to add; that
/// case and any failed add batch are reported as [`SaveOutcome::Incomplete`].
///
/// # Errors
///
/// - [`PipelineError::InvalidInput`] for a blank title
/// - any error of the profile lookup or the playlist creation
pub async fn save_playlist(
    catalog: &dyn Catalog,
    user_token: &str,
    title: &str,
    description: &str,
    uris: &[String],
) -> Result<SaveOutcome, PipelineError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(PipelineError::InvalidInput(
            "playlist title must not be empty".to_string(),
        ));
    }
    let description = match description.trim() {
        "" => DEFAULT_DESCRIPTION,
        d => d,
    };

    let user = catalog.current_user(user_token).await?;
    let created = catalog
        .create_playlist(user_token, &user.id, title, description)
        .await?;
    let playlist_id = created.id.clone();
    let playlist_url = playlist_url(&created.id, created.external_urls.spotify);
    info!("Created playlist {}", playlist_id);

    let valid = filter_track_uris(uris);
    if valid.is_empty() {
        warning!("{}", EMPTY_PLAYLIST_WARNING);
        return Ok(SaveOutcome::Incomplete {
            playlist_id,
            playlist_url,
            added: 0,
            requested: uris.len(),
            warning: EMPTY_PLAYLIST_WARNING.to_string(),
        });
    }

    let mut added = 0;
    let mut failed_batches = 0;
    for batch in valid.chunks(MAX_TRACKS_PER_REQUEST) {
        match catalog.add_tracks(user_token, &playlist_id, batch).await {
            Ok(()) => added += batch.len(),
            Err(e) => {
                warning!("Failed to add {} tracks: {}", batch.len(), e);
                failed_batches += 1;
            }
        }
    }

    if failed_batches > 0 {
        return Ok(SaveOutcome::Incomplete {
            playlist_id,
            playlist_url,
            added,
            requested: uris.len(),
            warning: format!(
                "Added {} of {} tracks; {} request(s) to add tracks failed.",
                added,
                uris.len(),
                failed_batches
            ),
        });
    }

    let skipped = uris.len() - valid.len();
    if skipped > 0 {
        return Ok(SaveOutcome::Incomplete {
            playlist_id,
            playlist_url,
            added,
            requested: uris.len(),
            warning: format!(
                "Skipped {} track(s) without a valid {} uri.",
                skipped,
                utils::TRACK_URI_PREFIX.trim_end_matches(':')
            ),
        });
    }

    Ok(SaveOutcome::Complete {
        playlist_id,
        playlist_url,
        added,
    })
}
