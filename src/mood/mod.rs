//! Language model stages of the pipeline.
//!
//! [`interpret_mood`] turns free text into a [`crate::types::MoodProfile`];
//! [`generate_candidates`] asks for concrete songs matching that profile.
//! Both stages only trust the fields they validate and ignore the rest.

mod candidates;
mod interpreter;

use serde_json::{Map, Value};

use crate::error::PipelineError;

pub use candidates::{TARGET_SUGGESTIONS, generate_candidates, parse_candidates};
pub use interpreter::{MAX_RECENT_TRACKS, interpret_mood, parse_mood_profile};

/// Parses a completion that must be a JSON object.
fn parse_object(content: &str) -> Result<Map<String, Value>, PipelineError> {
    if content.trim().is_empty() {
        return Err(PipelineError::UpstreamFormat(
            "empty completion from language model".to_string(),
        ));
    }

    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(PipelineError::UpstreamFormat(
            "completion is not a JSON object".to_string(),
        )),
        Err(e) => Err(PipelineError::UpstreamFormat(format!(
            "completion is not valid JSON: {}",
            e
        ))),
    }
}

/// String elements of an array field. `None` if the field is not an array.
fn string_array(map: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    map.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
