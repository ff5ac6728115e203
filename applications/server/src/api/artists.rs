/// Artist catalog API
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
    types::{Artist, ArtistId, CreateArtist},
    Document, TuneError,
};
use tunehub_storage::{artists, SqliteCollection};

pub async fn list_artists(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Envelope<Vec<Document>>>> {
    let collection = SqliteCollection::artists(state.pool.clone());
    let docs = state.shaper.execute(&collection, &params).await?;
    Ok(envelope::list("artists", docs))
}

pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Artist>>> {
    let id = ArtistId::new(id);
    let artist = artists::get_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| TuneError::not_found("artist", id.as_str()))?;

    Ok(envelope::record("artist", artist))
}

pub async fn create_artist(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(body): JsonBody<CreateArtist>,
) -> Result<(StatusCode, Json<Envelope<Artist>>)> {
    user.require_admin()?;

    let artist = body.into_artist()?;
    artists::create(&state.pool, &artist).await?;
    tracing::info!(artist_id = %artist.id, "Artist created");

    Ok((StatusCode::CREATED, envelope::record("artist", artist)))
}
