//! TuneHub Server Library
//!
//! Music catalog API with shaped listings, playlists, account management,
//! and ranged audio streaming.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{auth::AuthService, file_store::LocalFileStore, mailer::LogMailer};
pub use state::AppState;
