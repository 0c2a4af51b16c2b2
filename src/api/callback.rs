use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{config, spotify::SpotifyClient, types::PendingAuth, warning};

/// Completes the PKCE flow: checks `state`, then exchanges the code.
///
/// A callback whose `state` does not match the pending authorization is
/// rejected without contacting the token endpoint.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<PendingAuth>>>>,
) -> Html<&'static str> {
    if let Some(reason) = params.get("error") {
        warning!("Authorization denied: {}", reason);
        return Html("<h4>Authorization denied.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let verifier = {
        let lock = shared_state.lock().await;
        let Some(pending) = lock.as_ref() else {
            return Html("<h4>No authorization in progress.</h4>");
        };

        if params.get("state") != Some(&pending.state) {
            warning!("Rejected callback with a missing or mismatched state parameter");
            return Html("<h4>State mismatch. Please restart the login.</h4>");
        }

        pending.code_verifier.clone()
    };

    let client = SpotifyClient::new(config::catalog_config());
    match client
        .exchange_code(code, &verifier, &config::spotify_redirect_uri())
        .await
    {
        Ok(session) => {
            if let Some(pending) = shared_state.lock().await.as_mut() {
                pending.session = Some(session);
            }
            Html("<h2>Authentication successful.</h2><p>You can close this window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
