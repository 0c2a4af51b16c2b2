use serde_json::{Map, Value};

use super::{non_empty_string, parse_object, string_array};
use crate::{
    error::PipelineError,
    info,
    llm::LanguageModel,
    types::{MoodProfile, RecentTrack, TempoPreference},
};

/// Recently played tracks passed to the model as context.
pub const MAX_RECENT_TRACKS: usize = 10;

const DEFAULT_SCALE_VALUE: u8 = 5;

const SYSTEM_PROMPT: &str = "You are a music expert. Read how a listener describes their \
current mood and translate it into music: genres, artists and keywords that fit that \
feeling, an intensity level (1-10), an energy level (1-10) and a tempo preference \
(slow, medium or fast). Finish with a creative name and a short description for a \
playlist built around that mood.";

fn user_prompt(mood_description: &str, recent: &[RecentTrack]) -> String {
    let mut prompt = format!("My current mood: {}", mood_description.trim());

    if !recent.is_empty() {
        prompt.push_str("\n\nTracks I listened to recently:");
        for track in recent.iter().take(MAX_RECENT_TRACKS) {
            prompt.push_str(&format!("\n- {} - {}", track.artist, track.track));
        }
        prompt.push_str("\n\nTake my taste into account.");
    }

    prompt.push_str(
        "\n\nAnswer with a JSON object containing exactly these fields:\n\
         - genres: array of music genres matching the mood\n\
         - artists: array of artists to draw from\n\
         - mood_keywords: array of words describing the emotional quality of the music\n\
         - intensity: number from 1 to 10\n\
         - energy_level: number from 1 to 10\n\
         - tempo_preference: \"slow\", \"medium\" or \"fast\"\n\
         - playlist_name: a creative playlist name\n\
         - playlist_description: one short paragraph relating the playlist to the mood",
    );
    prompt
}

/// Derives a [`MoodProfile`] from a mood description.
///
/// Issues a single request; there is no retry at this layer.
///
/// # Errors
///
/// - [`PipelineError::InvalidInput`] for a blank mood description
/// - [`PipelineError::UpstreamFormat`] when the completion is empty, not a JSON
///   object, or lacks `genres`/`mood_keywords` arrays or non-empty
///   `playlist_name`/`playlist_description` strings
/// - transport errors from the language model client
pub async fn interpret_mood(
    model: &dyn LanguageModel,
    mood_description: &str,
    recent: &[RecentTrack],
) -> Result<MoodProfile, PipelineError> {
    if mood_description.trim().is_empty() {
        return Err(PipelineError::InvalidInput(
            "mood description must not be empty".to_string(),
        ));
    }

    info!("Analyzing mood with {}", model.model());
    let content = model
        .complete_json(SYSTEM_PROMPT, &user_prompt(mood_description, recent))
        .await?;

    parse_mood_profile(&content)
}

/// Validates and normalizes a mood analysis completion.
pub fn parse_mood_profile(content: &str) -> Result<MoodProfile, PipelineError> {
    let map = parse_object(content)?;

    let genres = string_array(&map, "genres").ok_or_else(|| missing("genres must be an array"))?;
    let mood_keywords = string_array(&map, "mood_keywords")
        .ok_or_else(|| missing("mood_keywords must be an array"))?;
    let playlist_name = non_empty_string(map.get("playlist_name"))
        .ok_or_else(|| missing("playlist_name must be a non-empty string"))?;
    let playlist_description = non_empty_string(map.get("playlist_description"))
        .ok_or_else(|| missing("playlist_description must be a non-empty string"))?;

    let tempo_preference = map
        .get("tempo_preference")
        .and_then(Value::as_str)
        .map(TempoPreference::from_label)
        .unwrap_or_default();

    Ok(MoodProfile {
        genres,
        artists: string_array(&map, "artists").unwrap_or_default(),
        mood_keywords,
        intensity: scale_value(&map, "intensity"),
        energy_level: scale_value(&map, "energy_level"),
        tempo_preference,
        playlist_name,
        playlist_description,
    })
}

fn missing(reason: &str) -> PipelineError {
    PipelineError::UpstreamFormat(format!("invalid mood analysis: {}", reason))
}

/// A 1-10 value; accepts numbers and numeric strings, defaults to 5.
fn scale_value(map: &Map<String, Value>, key: &str) -> u8 {
    let raw = match map.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match raw {
        Some(v) if v.is_finite() => v.round().clamp(1.0, 10.0) as u8,
        _ => DEFAULT_SCALE_VALUE,
    }
}
