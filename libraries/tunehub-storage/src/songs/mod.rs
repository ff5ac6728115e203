//! Song queries

use crate::{albums, artists};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tunehub_core::{error::Result, types::*, TuneError};

fn from_row(row: &SqliteRow) -> Result<Song> {
    let artist_ids: String = row.try_get("artist_ids")?;
    Ok(Song {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        genre: row.try_get("genre")?,
        language: row.try_get("language")?,
        album_id: row.try_get("album_id")?,
        artist_ids: serde_json::from_str(&artist_ids)?,
        rating: row.try_get("rating")?,
        cover_image_url: row.try_get("cover_image_url")?,
        song_url: row.try_get("song_url")?,
        lyrics_url: row.try_get("lyrics_url")?,
        released_at: row.try_get("released_at")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Insert a validated song after checking its album and artists exist
pub async fn create(pool: &SqlitePool, song: &Song) -> Result<()> {
    if let Some(album_id) = &song.album_id {
        if !albums::exists(pool, album_id).await? {
            return Err(TuneError::validation(format!(
                "No album found with id {album_id}"
            )));
        }
    }

    let missing = artists::missing(pool, &song.artist_ids).await?;
    if let Some(first) = missing.first() {
        return Err(TuneError::validation(format!(
            "No artist found with id {first}"
        )));
    }

    sqlx::query(
        r#"
        INSERT INTO songs (
            id, name, genre, language, album_id, artist_ids, rating,
            cover_image_url, song_url, lyrics_url, released_at, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&song.id)
    .bind(&song.name)
    .bind(&song.genre)
    .bind(&song.language)
    .bind(&song.album_id)
    .bind(serde_json::to_string(&song.artist_ids)?)
    .bind(song.rating)
    .bind(&song.cover_image_url)
    .bind(&song.song_url)
    .bind(&song.lyrics_url)
    .bind(&song.released_at)
    .bind(&song.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_by_id(pool: &SqlitePool, id: &SongId) -> Result<Option<Song>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, genre, language, album_id, artist_ids, rating,
               cover_image_url, song_url, lyrics_url, released_at, created_at
        FROM songs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Ids from `ids` that have no song record
pub async fn missing(conn: &mut SqliteConnection, ids: &[SongId]) -> Result<Vec<SongId>> {
    let mut missing = Vec::new();
    for id in ids {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM songs WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        if found.is_none() {
            missing.push(id.clone());
        }
    }
    Ok(missing)
}
