use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error, management::SessionManager, spotify, success, types::PendingAuth};

pub async fn auth(shared_state: Arc<Mutex<Option<PendingAuth>>>) {
    let session = match spotify::auth::auth(shared_state).await {
        Ok(session) => session,
        Err(e) => error!("{}", e),
    };

    if let Err(e) = SessionManager::new(session).persist().await {
        error!("Failed to save session to cache: {}", e);
    }

    success!("Authentication successful!");
}
