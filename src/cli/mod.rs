//! # CLI Module
//!
//! User-facing commands. Each command wires configuration, the Spotify client
//! and the local stores together, then hands off to the library:
//!
//! - [`generate`] - runs the mood pipeline, prints the tracks and records the
//!   playlist locally, optionally saving it to Spotify right away
//! - [`save`] - saves a recorded playlist to the user's Spotify account
//! - [`auth`] - authorization code flow with PKCE
//! - [`history`] - lists recorded playlists
//!
//! Fatal problems end the process through the `error!` macro; everything
//! below this layer returns errors instead.
//!
//! ```bash
//! moodyfy auth
//! moodyfy generate --mood "rainy sunday, slow coffee" --length 15
//! moodyfy history
//! moodyfy save --index 1 --name "Sunday Coffee"
//! ```

mod auth;
mod generate;
mod history;
mod save;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    error, info,
    management::SessionManager,
    spotify::SpotifyClient,
    success,
    types::{SaveOutcome, SaveResponse, Session},
    warning,
};

pub use auth::auth;
pub use generate::generate;
pub use history::history;
pub use save::save;

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Stored user session, refreshed if needed. `None` when there is no usable
/// session; the reason is logged.
async fn load_session(client: &SpotifyClient) -> Option<Session> {
    let manager = match SessionManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            warning!("{}", e);
            return None;
        }
    };

    match manager.refreshed(client).await {
        Ok(manager) => Some(manager.current_session().clone()),
        Err(e) => {
            warning!("Failed to refresh session, run moodyfy auth. Err: {}", e);
            None
        }
    }
}

fn report_save(outcome: &SaveOutcome) {
    match outcome {
        SaveOutcome::Complete {
            playlist_url,
            added,
            ..
        } => success!("Saved {} tracks: {}", added, playlist_url),
        SaveOutcome::Incomplete {
            playlist_url,
            added,
            requested,
            warning,
            ..
        } => {
            warning!("{}", warning);
            info!("Saved {} of {} tracks: {}", added, requested, playlist_url);
        }
    }
}

fn print_save_response(outcome: &SaveOutcome) {
    match serde_json::to_string_pretty(&SaveResponse::from(outcome)) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to encode save result. Err: {}", e),
    }
}
