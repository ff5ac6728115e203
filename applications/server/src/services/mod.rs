/// Server services
pub mod auth;
pub mod file_store;
pub mod mailer;
pub mod tokens;

pub use auth::AuthService;
pub use file_store::{FileStore, LocalFileStore, MediaKind};
pub use mailer::{LogMailer, Mail, Mailer};
