//! Album queries

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tunehub_core::{error::Result, types::*};

fn from_row(row: &SqliteRow) -> Result<Album> {
    Ok(Album {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        rating: row.try_get("rating")?,
        cover_image_url: row.try_get("cover_image_url")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Insert a validated album
pub async fn create(pool: &SqlitePool, album: &Album) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO albums (id, name, rating, cover_image_url, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&album.id)
    .bind(&album.name)
    .bind(album.rating)
    .bind(&album.cover_image_url)
    .bind(&album.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_by_id(pool: &SqlitePool, id: &AlbumId) -> Result<Option<Album>> {
    let row = sqlx::query(
        "SELECT id, name, rating, cover_image_url, created_at FROM albums WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

pub async fn exists(pool: &SqlitePool, id: &AlbumId) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM albums WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}
