//! JSON success envelopes
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

const SUCCESS: &str = "success";

/// `{status, results?, data: {<key>: value}}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    pub data: BTreeMap<&'static str, T>,
}

/// `{status, message}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: String,
}

/// `{status, token, data: {user}}`
#[derive(Debug, Serialize)]
pub struct TokenResponse<U> {
    pub status: &'static str,
    pub token: String,
    pub data: BTreeMap<&'static str, U>,
}

/// A single record under `key`
pub fn record<T: Serialize>(key: &'static str, value: T) -> Json<Envelope<T>> {
    Json(Envelope {
        status: SUCCESS,
        results: None,
        data: BTreeMap::from([(key, value)]),
    })
}

/// A list of records under `key`, with its length in `results`
pub fn list<T: Serialize>(key: &'static str, values: Vec<T>) -> Json<Envelope<Vec<T>>> {
    Json(Envelope {
        status: SUCCESS,
        results: Some(values.len()),
        data: BTreeMap::from([(key, values)]),
    })
}

pub fn message(message: impl Into<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        status: SUCCESS,
        message: message.into(),
    })
}

pub fn token<U: Serialize>(token: String, user: U) -> Json<TokenResponse<U>> {
    Json(TokenResponse {
        status: SUCCESS,
        token,
        data: BTreeMap::from([("user", user)]),
    })
}
