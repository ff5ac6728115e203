/// Media streaming API
///
/// Audio is served in byte windows (`206 Partial Content`), cover images
/// whole.
use crate::{
    error::{Result, ServerError},
    services::{file_store::file_not_found, MediaKind},
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use tunehub_core::RangeWindow;

const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// GET /api/v1/media/play/:song_file
pub async fn play_song(
    State(state): State<AppState>,
    Path(song_file): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let store = &state.file_store;

    if !store.exists(MediaKind::Song, &song_file).await {
        return Err(file_not_found());
    }

    let total = store.size(MediaKind::Song, &song_file).await?;
    let range = headers.get(header::RANGE).and_then(|h| h.to_str().ok());
    let window = RangeWindow::resolve(range, total, state.config.media.chunk_size)?;

    tracing::debug!(
        file = %song_file,
        start = window.start(),
        end = window.end(),
        total,
        "Streaming audio window"
    );

    let stream = store
        .open_range(MediaKind::Song, &song_file, window.start(), window.end())
        .await?;

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, AUDIO_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, window.len())
        .header(header::CONTENT_RANGE, window.content_range())
        .header(header::ACCEPT_RANGES, "bytes")
        .body(Body::from_stream(stream))
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
}

async fn serve_cover(state: &AppState, kind: MediaKind, image: &str) -> Result<Response> {
    let store = &state.file_store;

    if !store.exists(kind, image).await {
        return Err(file_not_found());
    }

    let size = store.size(kind, image).await?;
    let mime_type = mime_guess::from_path(image)
        .first_or_octet_stream()
        .to_string();
    let stream = store.open(kind, image).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_type)
        .header(header::CONTENT_LENGTH, size)
        .body(Body::from_stream(stream))
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
}

/// GET /api/v1/media/covers/songs/:image
pub async fn song_cover(
    State(state): State<AppState>,
    Path(image): Path<String>,
) -> Result<Response> {
    serve_cover(&state, MediaKind::SongCover, &image).await
}

/// GET /api/v1/media/covers/albums/:image
pub async fn album_cover(
    State(state): State<AppState>,
    Path(image): Path<String>,
) -> Result<Response> {
    serve_cover(&state, MediaKind::AlbumCover, &image).await
}

/// GET /api/v1/media/covers/artists/:image
pub async fn artist_cover(
    State(state): State<AppState>,
    Path(image): Path<String>,
) -> Result<Response> {
    serve_cover(&state, MediaKind::ArtistCover, &image).await
}
