/// Shared application state
use crate::{
    config::ServerConfig,
    services::{AuthService, FileStore, Mailer},
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tunehub_core::QueryShaper;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub file_store: Arc<dyn FileStore>,
    pub mailer: Arc<dyn Mailer>,
    pub shaper: Arc<QueryShaper>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build the state, deriving the auth service and query shaper from `config`
    pub fn new(
        config: ServerConfig,
        pool: SqlitePool,
        file_store: Arc<dyn FileStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let auth_service = AuthService::new(
            config.auth.jwt_secret.clone(),
            config.auth.jwt_expiration_hours,
            config.auth.bcrypt_cost,
        );
        let shaper = QueryShaper::new(config.query);

        Self {
            pool,
            auth_service: Arc::new(auth_service),
            file_store,
            mailer,
            shaper: Arc::new(shaper),
            config: Arc::new(config),
        }
    }
}
