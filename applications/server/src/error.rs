/// Server error types
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tunehub_core::{RangeWindow, TuneError};

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Range not satisfiable for {total} bytes")]
    RangeNotSatisfiable { total: u64 },

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Core(#[from] TuneError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl ServerError {
    /// Status code and client-facing message
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServerError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServerError::RangeNotSatisfiable { total } => (
                StatusCode::RANGE_NOT_SATISFIABLE,
                format!("Requested range not satisfiable (file is {total} bytes)"),
            ),
            ServerError::Core(err) => core_status(err),
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Mail(ref msg) => {
                tracing::error!("Mail error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "There was an error sending the email. Try again later!".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
            ServerError::Jwt(ref e) => {
                tracing::warn!("JWT error: {:?}", e);
                (
                    StatusCode::UNAUTHORIZED,
                    "Invalid token. Please log in again!".to_string(),
                )
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Password error".to_string(),
                )
            }
        }
    }
}

fn core_status(err: TuneError) -> (StatusCode, String) {
    match err {
        TuneError::NotFound { entity, id } => {
            (StatusCode::NOT_FOUND, format!("No {entity} found with id {id}"))
        }
        TuneError::Validation(msg) | TuneError::InvalidQuery(msg) => {
            (StatusCode::BAD_REQUEST, msg)
        }
        TuneError::Duplicate(ref msg) => {
            tracing::debug!("Duplicate entry: {}", msg);
            (
                StatusCode::CONFLICT,
                "Duplicate field value. Please use another value!".to_string(),
            )
        }
        TuneError::RangeNotSatisfiable { total } => {
            ServerError::RangeNotSatisfiable { total }.status_and_message()
        }
        ref e @ (TuneError::Io(_) | TuneError::Database(_) | TuneError::Serialization(_)) => {
            tracing::error!("Storage error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            )
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let unsatisfied_total = match &self {
            ServerError::RangeNotSatisfiable { total }
            | ServerError::Core(TuneError::RangeNotSatisfiable { total }) => Some(*total),
            _ => None,
        };

        let (status, message) = self.status_and_message();
        let outcome = if status.is_server_error() {
            "error"
        } else {
            "fail"
        };

        let body = Json(json!({
            "status": outcome,
            "message": message,
        }));

        let mut response = (status, body).into_response();
        if let Some(total) = unsatisfied_total {
            if let Ok(value) = HeaderValue::from_str(&RangeWindow::unsatisfied_content_range(total)) {
                response.headers_mut().insert(header::CONTENT_RANGE, value);
            }
        }
        response
    }
}

/// JSON body extractor whose rejections use the error envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(&rejection)),
        }
    }
}

fn json_rejection(rejection: &JsonRejection) -> ServerError {
    match rejection {
        JsonRejection::JsonDataError(e) => ServerError::BadRequest(e.body_text()),
        JsonRejection::JsonSyntaxError(_) => {
            ServerError::BadRequest("Request body is not valid JSON".to_string())
        }
        JsonRejection::MissingJsonContentType(_) => {
            ServerError::BadRequest("Expected a JSON request body".to_string())
        }
        other => ServerError::BadRequest(other.body_text()),
    }
}
