use serde_json::Value;

use super::{non_empty_string, parse_object};
use crate::{
    error::PipelineError,
    info,
    llm::LanguageModel,
    types::{CandidateSuggestion, MoodProfile},
};

/// Number of songs requested from the model.
pub const TARGET_SUGGESTIONS: usize = 25;

/// Distinct artists requested from the model. Not enforced downstream.
const TARGET_DISTINCT_ARTISTS: usize = 15;

const SYSTEM_PROMPT: &str = "You are a music recommendation expert who finds songs that fit a \
listener's mood. Recommend real songs only and spell every title and artist name exactly as \
it appears on Spotify, because each suggestion is looked up in the Spotify catalog \
afterwards. Never provide Spotify IDs, URIs or URLs: leave every such field as an empty \
string. Prefer well-known songs that certainly exist on Spotify.";

fn user_prompt(profile: &MoodProfile) -> String {
    format!(
        "Recommend {count} songs for this mood:\n\n\
         Genres: {genres}\n\
         Artists similar to: {artists}\n\
         Mood keywords: {keywords}\n\
         Energy level (1-10): {energy}\n\
         Tempo preference: {tempo}\n\n\
         The playlist is called \"{title}\".\n\n\
         Requirements:\n\
         - at least {count} songs, mixing well-known and lesser-known tracks\n\
         - songs from at least {artist_count} different artists\n\
         - one or two songs per artist\n\
         - only songs that exist on Spotify, with correct spelling\n\n\
         Respond with a JSON object of this form:\n\
         {{\"tracks\": [{{\"id\": \"1\", \"title\": \"Song Title\", \"artist\": \"Artist Name\", \
         \"album\": \"Album Name\", \"year\": 2001, \"spotifyUrl\": \"\"}}]}}",
        count = TARGET_SUGGESTIONS,
        artist_count = TARGET_DISTINCT_ARTISTS,
        genres = profile.genres.join(", "),
        artists = profile.artists.join(", "),
        keywords = profile.mood_keywords.join(", "),
        energy = profile.energy_level,
        tempo = profile.tempo_preference,
        title = profile.playlist_name,
    )
}

/// Asks the model for concrete songs matching `profile`.
///
/// # Errors
///
/// Returns [`PipelineError::UpstreamFormat`] if the completion is empty, not a
/// JSON object, or has no `tracks` array.
pub async fn generate_candidates(
    model: &dyn LanguageModel,
    profile: &MoodProfile,
) -> Result<Vec<CandidateSuggestion>, PipelineError> {
    info!("Requesting {} song suggestions", TARGET_SUGGESTIONS);
    let content = model
        .complete_json(SYSTEM_PROMPT, &user_prompt(profile))
        .await?;

    let suggestions = parse_candidates(&content)?;
    info!("Language model suggested {} songs", suggestions.len());
    Ok(suggestions)
}

/// Extracts suggestions from a completion.
///
/// Entries without a title or artist are skipped. Catalog identifiers the
/// model may have included anyway are ignored.
pub fn parse_candidates(content: &str) -> Result<Vec<CandidateSuggestion>, PipelineError> {
    let map = parse_object(content)?;
    let tracks = map.get("tracks").and_then(Value::as_array).ok_or_else(|| {
        PipelineError::UpstreamFormat("song suggestions lack a tracks array".to_string())
    })?;

    let suggestions = tracks
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let title = non_empty_string(item.get("title"))?;
            let artist = non_empty_string(item.get("artist"))?;
            let id = match item.get("id") {
                Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                Some(Value::Number(n)) => n.to_string(),
                _ => format!("suggestion_{}", index),
            };

            Some(CandidateSuggestion {
                id,
                title,
                artist,
                album: non_empty_string(item.get("album")),
                year: year(item.get("year")),
            })
        })
        .collect();

    Ok(suggestions)
}

fn year(value: Option<&Value>) -> Option<u32> {
    match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|y| u32::try_from(y).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}
