mod playlist;
mod session;

pub use playlist::PlaylistStore;
pub use session::SessionManager;
