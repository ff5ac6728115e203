/// API route modules
pub mod albums;
pub mod artists;
pub mod envelope;
pub mod health;
pub mod media;
pub mod playlists;
pub mod songs;
pub mod users;

use crate::{error::ServerError, middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Mount point of every route
pub const API_PREFIX: &str = "/api/v1";

/// Build the full application router
pub fn router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health))
        // Accounts
        .route("/users/signup", post(users::signup))
        .route("/users/verify-email/:token", post(users::verify_email))
        .route("/users/login", post(users::login))
        .route("/users/forgot-password", post(users::forgot_password))
        .route("/users/reset-password/:token", post(users::reset_password))
        // Media
        .route("/media/play/:song_file", get(media::play_song))
        .route("/media/covers/songs/:image", get(media::song_cover))
        .route("/media/covers/albums/:image", get(media::album_cover))
        .route("/media/covers/artists/:image", get(media::artist_cover));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/users/me", get(users::me))
        // Catalog
        .route("/songs", get(songs::list_songs).post(songs::create_song))
        .route("/songs/:id", get(songs::get_song))
        .route("/albums", get(albums::list_albums).post(albums::create_album))
        .route("/albums/:id", get(albums::get_album))
        .route(
            "/artists",
            get(artists::list_artists).post(artists::create_artist),
        )
        .route("/artists/:id", get(artists::get_artist))
        // Playlists
        .route(
            "/playlists",
            get(playlists::list_playlists).post(playlists::create_playlist),
        )
        .route(
            "/playlists/:id",
            get(playlists::get_playlist)
                .patch(playlists::update_playlist)
                .delete(playlists::delete_playlist),
        )
        .route("/playlists/:id/add-songs", patch(playlists::add_songs))
        .route("/playlists/:id/remove-songs", patch(playlists::remove_songs))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::protect,
        ));

    Router::new()
        .nest(API_PREFIX, public_routes.merge(protected_routes))
        .fallback(route_not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn route_not_found() -> ServerError {
    ServerError::NotFound("This route is not defined!".to_string())
}
