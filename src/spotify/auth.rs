use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::Url;
use tokio::sync::Mutex;

use crate::{
    config,
    error::PipelineError,
    info,
    server::start_api_server,
    types::{PendingAuth, Session},
    utils, warning,
};

/// How long the `auth` command waits for the browser round trip.
const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds the authorization URL for the PKCE flow.
///
/// `state` is echoed back by the authorization server and must be checked by
/// the callback handler before the code is exchanged.
pub fn authorize_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    code_challenge: &str,
    state: &str,
) -> Result<Url, PipelineError> {
    Url::parse_with_params(
        auth_url,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("code_challenge_method", "S256"),
            ("code_challenge", code_challenge),
            ("scope", scope),
            ("state", state),
        ],
    )
    .map_err(|e| PipelineError::InvalidInput(format!("invalid authorization url: {}", e)))
}

/// Runs the authorization code flow with PKCE and returns the new session.
///
/// Starts the callback server, opens the authorization page in the browser and
/// waits until the callback handler stored a session in `shared_state`.
///
/// # Errors
///
/// - [`PipelineError::CredentialMissing`] without `SPOTIFY_CLIENT_ID`
/// - [`PipelineError::Auth`] when no session arrived before the timeout
pub async fn auth(shared_state: Arc<Mutex<Option<PendingAuth>>>) -> Result<Session, PipelineError> {
    let client_id =
        config::spotify_client_id().ok_or(PipelineError::CredentialMissing("SPOTIFY_CLIENT_ID"))?;

    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let state = utils::generate_state();

    let auth_url = authorize_url(
        &config::spotify_apiauth_url(),
        &client_id,
        &config::spotify_redirect_uri(),
        &config::spotify_scope(),
        &code_challenge,
        &state,
    )?;

    // the verifier has to be in place before the browser can hit the callback
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PendingAuth {
            code_verifier,
            state,
            session: None,
        });
    }

    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    info!("Waiting for authorization in the browser");
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    wait_for_session(shared_state, AUTH_TIMEOUT)
        .await
        .ok_or_else(|| PipelineError::Auth("authorization failed or timed out".to_string()))
}

async fn wait_for_session(
    shared_state: Arc<Mutex<Option<PendingAuth>>>,
    max_wait: Duration,
) -> Option<Session> {
    let start = Instant::now();

    while start.elapsed() < max_wait {
        {
            let lock = shared_state.lock().await;
            if let Some(session) = lock.as_ref().and_then(|p| p.session.clone()) {
                return Some(session);
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
