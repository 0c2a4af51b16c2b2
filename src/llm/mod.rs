//! Language model abstraction.
//!
//! The pipeline only ever needs one kind of call: a system + user prompt that
//! must be answered with a JSON object. [`LanguageModel`] captures exactly
//! that, so the mood stages can run against any OpenAI-compatible backend or
//! a fake in tests.

mod openai;

use async_trait::async_trait;

use crate::error::PipelineError;

pub use openai::OpenAiClient;

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier, for log output.
    fn model(&self) -> &str;

    /// Sends one chat completion and returns the raw content of the first
    /// choice. The content is expected to be a JSON object but is not parsed
    /// here. An empty string means the model returned no content.
    async fn complete_json(&self, system: &str, user: &str) -> Result<String, PipelineError>;
}
