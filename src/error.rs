//! Error taxonomy for the mood-to-playlist pipeline.
//!
//! Most variants are recoverable inside the pipeline: a stage that fails
//! hands control to the next fallback tier. Only [`PipelineError::MoodAnalysisFailed`]
//! and [`PipelineError::InvalidInput`] reach the caller of
//! [`crate::pipeline::generate_playlist`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The language model answered, but not with the structure we asked for.
    #[error("Unexpected upstream response format: {0}")]
    UpstreamFormat(String),

    /// The mood could not be interpreted. Fatal for the whole pipeline.
    #[error("Failed to analyze mood: {0}")]
    MoodAnalysisFailed(#[source] Box<PipelineError>),

    #[error("Missing credential: {0}")]
    CredentialMissing(&'static str),

    #[error("Catalog request failed ({context}): status {status}")]
    CatalogRequestFailed { status: u16, context: String },

    #[error("Rate limited by {0}")]
    RateLimited(String),

    #[error("Language model request failed (status {status}): {message}")]
    LanguageModelFailed { status: u16, message: String },

    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn catalog(status: u16, context: impl Into<String>) -> Self {
        PipelineError::CatalogRequestFailed {
            status,
            context: context.into(),
        }
    }

    /// True for the error a failed mood analysis carries upward.
    pub fn is_mood_analysis_failure(&self) -> bool {
        matches!(self, PipelineError::MoodAnalysisFailed(_))
    }
}
