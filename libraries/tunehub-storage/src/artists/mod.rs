//! Artist queries

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tunehub_core::{error::Result, types::*};

fn from_row(row: &SqliteRow) -> Result<Artist> {
    Ok(Artist {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        bio: row.try_get("bio")?,
        rating: row.try_get("rating")?,
        cover_image_url: row.try_get("cover_image_url")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Insert a validated artist
pub async fn create(pool: &SqlitePool, artist: &Artist) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO artists (id, name, bio, rating, cover_image_url, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&artist.id)
    .bind(&artist.name)
    .bind(&artist.bio)
    .bind(artist.rating)
    .bind(&artist.cover_image_url)
    .bind(&artist.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_by_id(pool: &SqlitePool, id: &ArtistId) -> Result<Option<Artist>> {
    let row = sqlx::query(
        "SELECT id, name, bio, rating, cover_image_url, created_at FROM artists WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Ids from `ids` that have no artist record
pub async fn missing(pool: &SqlitePool, ids: &[ArtistId]) -> Result<Vec<ArtistId>> {
    let mut missing = Vec::new();
    for id in ids {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM artists WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if found.is_none() {
            missing.push(id.clone());
        }
    }
    Ok(missing)
}
