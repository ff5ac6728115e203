//! Test helpers and fixtures for storage integration tests
//!
//! Databases are REAL SQLite files in a temp dir (NOT in-memory) so every
//! pooled connection sees the same data and migrations run as in production.

#![allow(dead_code)]

use sqlx::SqlitePool;
use tempfile::TempDir;
use tunehub_core::types::*;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = tunehub_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        tunehub_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: create a verified user
pub async fn create_test_user(pool: &SqlitePool, email: &str) -> User {
    let new_user = NewUser {
        name: "Test User".to_string(),
        age: 30,
        gender: Gender::Other,
        email: email.to_string(),
        password: "password123".to_string(),
        role: Role::User,
    };
    tunehub_storage::users::create(pool, &new_user, "not-a-real-hash", None)
        .await
        .expect("Failed to create test user")
}

/// Test fixture: create an artist
pub async fn create_test_artist(pool: &SqlitePool, name: &str) -> Artist {
    let artist = CreateArtist {
        name: Some(name.to_string()),
        ..CreateArtist::default()
    }
    .into_artist()
    .expect("Invalid test artist");
    tunehub_storage::artists::create(pool, &artist)
        .await
        .expect("Failed to create test artist");
    artist
}

/// Test fixture: create an album
pub async fn create_test_album(pool: &SqlitePool, name: &str) -> Album {
    let album = CreateAlbum {
        name: Some(name.to_string()),
        ..CreateAlbum::default()
    }
    .into_album()
    .expect("Invalid test album");
    tunehub_storage::albums::create(pool, &album)
        .await
        .expect("Failed to create test album");
    album
}

/// Test fixture: create a song with a controlled creation time
pub async fn create_test_song(
    pool: &SqlitePool,
    name: &str,
    genre: &str,
    rating: f64,
    created_at: &str,
) -> Song {
    let mut song = CreateSong {
        name: Some(name.to_string()),
        genre: Some(genre.to_string()),
        rating: Some(rating),
        ..CreateSong::default()
    }
    .into_song()
    .expect("Invalid test song");
    song.created_at = created_at.to_string();

    tunehub_storage::songs::create(pool, &song)
        .await
        .expect("Failed to create test song");
    song
}

/// Canonical timestamp `n` minutes into 2024
pub fn minute(n: u32) -> String {
    format!("2024-01-01T{:02}:{:02}:00.000Z", n / 60, n % 60)
}
