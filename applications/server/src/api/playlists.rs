/// Playlist management API
///
/// Playlists a caller may not see are reported as missing.
use super::envelope::{self, Envelope};
use crate::{
    error::{JsonBody, Result},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tunehub_core::{
    types::{CreatePlaylist, Playlist, PlaylistId, PopulatedPlaylist, SongId, UpdatePlaylist},
    TuneError,
};
use tunehub_storage::playlists;

#[derive(Debug, Deserialize)]
pub struct SongsRequest {
    #[serde(default)]
    pub songs: Vec<SongId>,
}

/// GET /api/v1/playlists - the caller's playlists
pub async fn list_playlists(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Envelope<Vec<Playlist>>>> {
    let playlists = playlists::get_by_owner(&state.pool, &user.user().id).await?;
    Ok(envelope::list("playlists", playlists))
}

/// POST /api/v1/playlists
pub async fn create_playlist(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(body): JsonBody<CreatePlaylist>,
) -> Result<(StatusCode, Json<Envelope<Playlist>>)> {
    let playlist = body.into_playlist(user.user().id.clone())?;
    playlists::create(&state.pool, &playlist).await?;
    tracing::info!(playlist_id = %playlist.id, "Playlist created");

    Ok((StatusCode::CREATED, envelope::record("playlist", playlist)))
}

/// GET /api/v1/playlists/:id - with songs resolved
pub async fn get_playlist(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<PopulatedPlaylist>>> {
    let id = PlaylistId::new(id);
    let playlist = playlists::get_by_id(&state.pool, &id)
        .await?
        .filter(|p| p.is_visible_to(&user.user().id))
        .ok_or_else(|| TuneError::not_found("playlist", id.as_str()))?;

    let populated = playlists::populate(&state.pool, playlist).await?;
    Ok(envelope::record("playlist", populated))
}

/// PATCH /api/v1/playlists/:id
pub async fn update_playlist(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdatePlaylist>,
) -> Result<Json<Envelope<Playlist>>> {
    let id = PlaylistId::new(id);
    let playlist = playlists::modify(&state.pool, &id, &user.user().id, |playlist| {
        body.apply(playlist)
    })
    .await?;

    Ok(envelope::record("playlist", playlist))
}

/// DELETE /api/v1/playlists/:id
pub async fn delete_playlist(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = PlaylistId::new(id);
    playlists::delete(&state.pool, &id, &user.user().id).await?;
    tracing::info!(playlist_id = %id, "Playlist deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/playlists/:id/add-songs
pub async fn add_songs(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<SongsRequest>,
) -> Result<Json<Envelope<Playlist>>> {
    let id = PlaylistId::new(id);
    let playlist = playlists::modify(&state.pool, &id, &user.user().id, |mut playlist| {
        playlist.add_songs(&body.songs);
        Ok(playlist)
    })
    .await?;

    Ok(envelope::record("playlist", playlist))
}

/// PATCH /api/v1/playlists/:id/remove-songs
pub async fn remove_songs(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<SongsRequest>,
) -> Result<Json<Envelope<Playlist>>> {
    let id = PlaylistId::new(id);
    let playlist = playlists::modify(&state.pool, &id, &user.user().id, |mut playlist| {
        playlist.remove_songs(&body.songs);
        Ok(playlist)
    })
    .await?;

    Ok(envelope::record("playlist", playlist))
}
