/// Catalog API integration tests
/// Admin-only creation, shaped listings, and single-record lookups
mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};
use tunehub_core::types::Role;

async fn create_song(app: &TestApp, token: &str, body: Value) -> Value {
    let response = app.post("/api/v1/songs", Some(token), body).await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.json());
    response.json()["data"]["song"].clone()
}

fn names(body: &Value, key: &str) -> Vec<String> {
    body["data"][key]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_only_admins_create_catalog_entries() {
    let app = TestApp::new().await;
    let (_, user_token) = app.user("listener@example.com", Role::User).await;
    let (_, admin_token) = app.admin().await;

    for uri in ["/api/v1/songs", "/api/v1/albums", "/api/v1/artists"] {
        let response = app
            .post(uri, Some(&user_token), json!({ "name": "Blue Train" }))
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(response.json()["status"], "fail");
    }

    let response = app
        .post("/api/v1/albums", Some(&admin_token), json!({ "name": "Blue Train" }))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["data"]["album"]["name"], "Blue Train");
}

#[tokio::test]
async fn test_song_creation_validates_references() {
    let app = TestApp::new().await;
    let (_, token) = app.admin().await;

    let response = app
        .post(
            "/api/v1/songs",
            Some(&token),
            json!({ "name": "Moment's Notice", "album_id": "missing-album" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app.post("/api/v1/songs", Some(&token), json!({ "name": "abc" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let artist = app
        .post("/api/v1/artists", Some(&token), json!({ "name": "John Coltrane" }))
        .await
        .json()["data"]["artist"]
        .clone();
    let album = app
        .post("/api/v1/albums", Some(&token), json!({ "name": "Blue Train" }))
        .await
        .json()["data"]["album"]
        .clone();

    let song = create_song(
        &app,
        &token,
        json!({
            "name": "Moment's Notice",
            "genre": "Jazz",
            "album_id": album["id"],
            "artist_ids": [artist["id"]],
            "rating": 4.5,
        }),
    )
    .await;

    assert_eq!(song["album_id"], album["id"]);
    assert_eq!(song["artist_ids"], json!([artist["id"]]));

    let response = app
        .get(&format!("/api/v1/songs/{}", song["id"].as_str().unwrap()), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["data"]["song"]["name"], "Moment's Notice");
}

#[tokio::test]
async fn test_missing_record_is_404_envelope() {
    let app = TestApp::new().await;
    let (_, token) = app.user("reader@example.com", Role::User).await;

    for uri in [
        "/api/v1/songs/nope",
        "/api/v1/albums/nope",
        "/api/v1/artists/nope",
    ] {
        let response = app.get(uri, Some(&token)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.json()["status"], "fail");
    }
}

#[tokio::test]
async fn test_listing_filters_sorts_and_pages() {
    let app = TestApp::new().await;
    let (_, token) = app.admin().await;

    for (name, genre, rating) in [
        ("Giant Steps", "Jazz", 5.0),
        ("So What", "Jazz", 4.0),
        ("Paranoid", "Metal", 3.5),
        ("Naima", "Jazz", 3.0),
        ("Blackbird", "Folk", 4.0),
    ] {
        create_song(
            &app,
            &token,
            json!({ "name": name, "genre": genre, "rating": rating }),
        )
        .await;
    }

    let response = app
        .get("/api/v1/songs?genre=Jazz&rating%5Bgte%5D=3.5&sort=-rating", Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["results"], 2);
    assert_eq!(names(&body, "songs"), vec!["Giant Steps", "So What"]);

    // Ties on rating keep creation order
    let body = app
        .get("/api/v1/songs?sort=-rating&page=2&limit=2", Some(&token))
        .await
        .json();
    assert_eq!(names(&body, "songs"), vec!["Blackbird", "Paranoid"]);

    let body = app
        .get("/api/v1/songs?fields=name&sort=name&limit=1", Some(&token))
        .await
        .json();
    let first = body["data"]["songs"][0].as_object().unwrap();
    assert_eq!(first.len(), 2);
    assert!(first.contains_key("id"));
    assert_eq!(first["name"], "Blackbird");
}

#[tokio::test]
async fn test_invalid_listing_parameters() {
    let app = TestApp::new().await;
    let (_, token) = app.user("reader@example.com", Role::User).await;

    for query in [
        "rating%5Bne%5D=3",
        "no_such_field=1",
        "rating=loud",
        "fields=name,-genre",
        "sort=password",
    ] {
        let response = app
            .get(&format!("/api/v1/songs?{query}"), Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{query}");
        assert_eq!(response.json()["status"], "fail");
    }

    // Bad pagination falls back to defaults instead of failing
    let response = app
        .get("/api/v1/songs?page=zero&limit=-4", Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_album_and_artist_listings() {
    let app = TestApp::new().await;
    let (_, token) = app.admin().await;

    for name in ["Kind of Blue", "A Love Supreme"] {
        app.post("/api/v1/albums", Some(&token), json!({ "name": name }))
            .await;
    }
    app.post(
        "/api/v1/artists",
        Some(&token),
        json!({ "name": "Miles Davis", "bio": "Trumpeter and bandleader", "rating": 5 }),
    )
    .await;

    let body = app.get("/api/v1/albums?sort=name", Some(&token)).await.json();
    assert_eq!(body["results"], 2);
    assert_eq!(names(&body, "albums"), vec!["A Love Supreme", "Kind of Blue"]);

    let body = app.get("/api/v1/artists?rating%5Bgt%5D=4", Some(&token)).await.json();
    assert_eq!(names(&body, "artists"), vec!["Miles Davis"]);
}
