/// Song catalog API
use super::envelope::{self, Envelope};
use crate::{
    error::{JsonBody, Result},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tunehub_core::{
    types::{CreateSong, Song, SongId},
    Document, TuneError,
};
use tunehub_storage::{songs, SqliteCollection};

/// GET /api/v1/songs - shaped listing
pub async fn list_songs(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Envelope<Vec<Document>>>> {
    let collection = SqliteCollection::songs(state.pool.clone());
    let docs = state.shaper.execute(&collection, &params).await?;
    Ok(envelope::list("songs", docs))
}

/// GET /api/v1/songs/:id
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Song>>> {
    let id = SongId::new(id);
    let song = songs::get_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| TuneError::not_found("song", id.as_str()))?;

    Ok(envelope::record("song", song))
}

/// POST /api/v1/songs - admin only
pub async fn create_song(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(body): JsonBody<CreateSong>,
) -> Result<(StatusCode, Json<Envelope<Song>>)> {
    user.require_admin()?;

    let song = body.into_song()?;
    songs::create(&state.pool, &song).await?;
    tracing::info!(song_id = %song.id, "Song created");

    Ok((StatusCode::CREATED, envelope::record("song", song)))
}
