use std::time::Duration;

use tokio::time::sleep;

use crate::{
    info,
    spotify::Catalog,
    types::{CandidateSuggestion, Track},
    utils::{self, DEFAULT_COVER_URL},
    warning,
};

/// Resolves suggestions against the catalog, one search at a time.
///
/// Waits `delay` before every search. Suggestions without a match and
/// suggestions whose search failed are dropped; the rest keep their order.
pub async fn validate_candidates(
    catalog: &dyn Catalog,
    token: &str,
    suggestions: &[CandidateSuggestion],
    delay: Duration,
) -> Vec<Track> {
    info!("Validating {} suggestions", suggestions.len());
    let mut validated = Vec::with_capacity(suggestions.len());

    for suggestion in suggestions {
        if !delay.is_zero() {
            sleep(delay).await;
        }

        match catalog
            .search_track(token, &suggestion.title, &suggestion.artist)
            .await
        {
            Ok(Some(track)) => validated.push(track),
            Ok(None) => {
                info!(
                    "No catalog match for {} - {}",
                    suggestion.artist, suggestion.title
                );
            }
            Err(e) => {
                warning!(
                    "Search failed for {} - {}: {}",
                    suggestion.artist,
                    suggestion.title,
                    e
                );
            }
        }
    }

    info!(
        "{} of {} suggestions found on Spotify",
        validated.len(),
        suggestions.len()
    );
    validated
}

/// Tracks for suggestions that could not be validated at all.
///
/// Each links to a catalog search for its title and artist and has an empty
/// uri, so none of them is playlist-addable.
pub fn search_link_tracks(suggestions: &[CandidateSuggestion]) -> Vec<Track> {
    suggestions
        .iter()
        .map(|s| Track {
            id: s.id.clone(),
            title: s.title.clone(),
            artist: s.artist.clone(),
            uri: String::new(),
            album_image: Some(DEFAULT_COVER_URL.to_string()),
            preview_url: None,
            external_url: utils::search_link(&s.title, &s.artist),
        })
        .collect()
}
