/// Album catalog API
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
    types::{Album, AlbumId, CreateAlbum},
    Document, TuneError,
};
use tunehub_storage::{albums, SqliteCollection};

/// GET /api/v1/albums
pub async fn list_albums(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Envelope<Vec<Document>>>> {
    let collection = SqliteCollection::albums(state.pool.clone());
    let docs = state.shaper.execute(&collection, &params).await?;
    Ok(envelope::list("albums", docs))
}

/// GET /api/v1/albums/:id
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Album>>> {
    let id = AlbumId::new(id);
    let album = albums::get_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| TuneError::not_found("album", id.as_str()))?;

    Ok(envelope::record("album", album))
}

/// POST /api/v1/albums
pub async fn create_album(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(body): JsonBody<CreateAlbum>,
) -> Result<(StatusCode, Json<Envelope<Album>>)> {
    user.require_admin()?;

    let album = body.into_album()?;
    albums::create(&state.pool, &album).await?;
    tracing::info!(album_id = %album.id, "Album created");

    Ok((StatusCode::CREATED, envelope::record("album", album)))
}
