//! # API Module
//!
//! HTTP endpoints of the short-lived local server that receives the OAuth
//! redirect during `moodyfy auth`.
//!
//! - [`callback`] - checks the `state` parameter and exchanges the
//!   authorization code for a user session
//! - [`health`] - status and version, handy to check that the redirect
//!   address is reachable
//!
//! Routing lives in [`crate::server`].

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
