/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tunehub_core::range::DEFAULT_CHUNK_SIZE;
use tunehub_core::ShaperConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default)]
    pub query: ShaperConfig,

    #[serde(default = "default_media")]
    pub media: MediaSettings,

    #[serde(default = "default_mail")]
    pub mail: MailSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL used in links sent by email
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Root of the audio and cover image tree
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,

    #[serde(default = "default_token_minutes")]
    pub email_verification_minutes: u64,

    #[serde(default = "default_token_minutes")]
    pub password_reset_minutes: u64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaSettings {
    /// Bytes served for an open-ended range
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailSettings {
    #[serde(default = "default_mail_from")]
    pub from: String,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` overrides the default `config.toml` lookup. Environment
    /// variables use the `TUNEHUB` prefix and `__` between sections, e.g.
    /// `TUNEHUB__AUTH__JWT_SECRET`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("TUNEHUB")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set TUNEHUB__AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if self.query.default_limit == 0 || self.query.max_limit == 0 {
            return Err(ServerError::Config(
                "query.default_limit and query.max_limit must be positive".to_string(),
            ));
        }

        if self.media.chunk_size == 0 {
            return Err(ServerError::Config(
                "media.chunk_size must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
        public_url: default_public_url(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        media_root: default_media_root(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/tunehub.db".to_string()
}

fn default_media_root() -> PathBuf {
    PathBuf::from("./data/media")
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        jwt_expiration_hours: default_jwt_expiration_hours(),
        email_verification_minutes: default_token_minutes(),
        password_reset_minutes: default_token_minutes(),
        bcrypt_cost: default_bcrypt_cost(),
    }
}

fn default_jwt_expiration_hours() -> u64 {
    24 * 90
}

fn default_token_minutes() -> u64 {
    10
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_media() -> MediaSettings {
    MediaSettings {
        chunk_size: default_chunk_size(),
    }
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

fn default_mail() -> MailSettings {
    MailSettings {
        from: default_mail_from(),
    }
}

fn default_mail_from() -> String {
    "TuneHub <noreply@tunehub.local>".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            query: ShaperConfig::default(),
            media: default_media(),
            mail: default_mail(),
        }
    }
}
