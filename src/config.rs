//! Configuration management for moodyfy.
//!
//! Values come from environment variables, optionally loaded from a `.env`
//! file in the local data directory. Endpoints and the model name fall back to
//! the public defaults; credentials are optional so that a missing credential
//! surfaces as [`PipelineError::CredentialMissing`] where it is needed
//! instead of stopping the program at startup.

use std::{env, path::PathBuf};

use crate::{
    error::PipelineError,
    llm::OpenAiClient,
    spotify::{CatalogConfig, retry::RetryPolicy},
};

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_SPOTIFY_SCOPE: &str =
    "user-read-recently-played playlist-modify-public playlist-modify-private";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

/// Loads environment variables from `moodyfy/.env` in the local data directory.
///
/// The directory is created if it does not exist. A missing `.env` file is
/// not an error: the process environment may already carry every value.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/moodyfy/.env`
/// - macOS: `~/Library/Application Support/moodyfy/.env`
/// - Windows: `%LOCALAPPDATA%/moodyfy/.env`
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("moodyfy/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Address the local OAuth callback server binds to.
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

pub fn openai_api_key() -> Option<String> {
    optional_var("OPENAI_API_KEY")
}

/// Base URL of the OpenAI-compatible API, e.g. `https://api.openai.com/v1`.
pub fn openai_api_url() -> String {
    var_or("OPENAI_API_URL", DEFAULT_OPENAI_API_URL)
}

/// Model used for every completion in this process.
pub fn openai_model() -> String {
    var_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL)
}

pub fn spotify_client_id() -> Option<String> {
    optional_var("SPOTIFY_CLIENT_ID")
}

pub fn spotify_client_secret() -> Option<String> {
    optional_var("SPOTIFY_CLIENT_SECRET")
}

/// Must match a redirect URI registered for the Spotify application.
pub fn spotify_redirect_uri() -> String {
    let fallback = format!("http://{}/callback", server_addr());
    var_or("SPOTIFY_API_REDIRECT_URI", &fallback)
}

pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SPOTIFY_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL)
}

pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL)
}

/// Catalog client configuration assembled from the environment.
pub fn catalog_config() -> CatalogConfig {
    CatalogConfig {
        api_url: spotify_apiurl(),
        token_url: spotify_apitoken_url(),
        client_id: spotify_client_id(),
        client_secret: spotify_client_secret(),
        retry: RetryPolicy::default(),
    }
}

/// Language model client assembled from the environment.
///
/// # Errors
///
/// Returns [`PipelineError::CredentialMissing`] when `OPENAI_API_KEY` is unset.
pub fn language_model() -> Result<OpenAiClient, PipelineError> {
    let api_key = openai_api_key().ok_or(PipelineError::CredentialMissing("OPENAI_API_KEY"))?;
    Ok(OpenAiClient::new(openai_api_url(), openai_model(), api_key))
}
