use crate::songs;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool, Transaction};
use tunehub_core::{error::Result, types::*, TuneError};

fn from_row(row: &SqliteRow, songs: Vec<SongId>) -> Result<Playlist> {
    let kind: String = row.try_get("kind")?;
    Ok(Playlist {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        kind: kind.parse()?,
        songs,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
    })
}

fn not_found(id: &PlaylistId) -> TuneError {
    TuneError::not_found("playlist", id.as_str())
}

async fn song_ids(conn: &mut SqliteConnection, playlist_id: &PlaylistId) -> Result<Vec<SongId>> {
    let ids: Vec<SongId> = sqlx::query_scalar(
        "SELECT song_id FROM playlist_songs WHERE playlist_id = ? ORDER BY position",
    )
    .bind(playlist_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(ids)
}

async fn ensure_songs_exist(conn: &mut SqliteConnection, ids: &[SongId]) -> Result<()> {
    let missing = songs::missing(conn, ids).await?;
    match missing.first() {
        Some(id) => Err(TuneError::validation(format!("No song found with id {id}"))),
        None => Ok(()),
    }
}

async fn write_songs(
    tx: &mut Transaction<'_, Sqlite>,
    playlist_id: &PlaylistId,
    songs: &[SongId],
) -> Result<()> {
    sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ?")
        .bind(playlist_id)
        .execute(&mut **tx)
        .await?;

    for (position, song_id) in (0_i64..).zip(songs) {
        sqlx::query("INSERT INTO playlist_songs (playlist_id, song_id, position) VALUES (?, ?, ?)")
            .bind(playlist_id)
            .bind(song_id)
            .bind(position)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

async fn load(conn: &mut SqliteConnection, id: &PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query("SELECT id, name, kind, created_by, created_at FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let songs = song_ids(conn, id).await?;
    from_row(&row, songs).map(Some)
}

/// Claim the write lock for `tx` if `owner` owns the playlist
///
/// Must be the first statement of `tx`: SQLite then queues competing writers
/// here, before anything is read.
async fn lock_owned(
    tx: &mut Transaction<'_, Sqlite>,
    id: &PlaylistId,
    owner: &UserId,
) -> Result<()> {
    let result = sqlx::query("UPDATE playlists SET name = name WHERE id = ? AND created_by = ?")
        .bind(id)
        .bind(owner)
        .execute(&mut **tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

/// Get a playlist and its song ids, in order
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let mut conn = pool.acquire().await?;
    load(&mut conn, id).await
}

/// Playlists created by `owner`, newest first
pub async fn get_by_owner(pool: &SqlitePool, owner: &UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, kind, created_by, created_at
        FROM playlists
        WHERE created_by = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;

    let mut conn = pool.acquire().await?;
    let mut playlists = Vec::with_capacity(rows.len());
    for row in &rows {
        let id: PlaylistId = row.try_get("id")?;
        let songs = song_ids(&mut conn, &id).await?;
        playlists.push(from_row(row, songs)?);
    }
    Ok(playlists)
}

/// Resolve a playlist's songs, keeping playlist order
pub async fn populate(pool: &SqlitePool, playlist: Playlist) -> Result<PopulatedPlaylist> {
    let rows = sqlx::query(
        r#"
        SELECT s.id, s.name, s.genre, s.language, s.album_id, s.rating,
               s.cover_image_url, s.song_url, s.lyrics_url, s.released_at
        FROM playlist_songs ps
        INNER JOIN songs s ON ps.song_id = s.id
        WHERE ps.playlist_id = ?
        ORDER BY ps.position
        "#,
    )
    .bind(&playlist.id)
    .fetch_all(pool)
    .await?;

    let songs = rows
        .iter()
        .map(|row| {
            Ok(PlaylistSong {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                genre: row.try_get("genre")?,
                language: row.try_get("language")?,
                album_id: row.try_get("album_id")?,
                rating: row.try_get("rating")?,
                cover_image_url: row.try_get("cover_image_url")?,
                song_url: row.try_get("song_url")?,
                lyrics_url: row.try_get("lyrics_url")?,
                released_at: row.try_get("released_at")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PopulatedPlaylist::new(playlist, songs))
}

/// Insert a validated playlist; every song must exist
pub async fn create(pool: &SqlitePool, playlist: &Playlist) -> Result<()> {
    ensure_songs_exist(&mut *pool.acquire().await?, &playlist.songs).await?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO playlists (id, name, kind, created_by, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&playlist.id)
    .bind(&playlist.name)
    .bind(playlist.kind.as_str())
    .bind(&playlist.created_by)
    .bind(&playlist.created_at)
    .execute(&mut *tx)
    .await?;

    write_songs(&mut tx, &playlist.id, &playlist.songs).await?;

    tx.commit().await?;

    Ok(())
}

/// Apply `change` to a playlist owned by `owner` and persist the result
///
/// The current state is read and written inside one write transaction, so
/// concurrent edits of the same playlist are applied one after another.
/// Songs the change introduces must exist.
pub async fn modify<F>(
    pool: &SqlitePool,
    id: &PlaylistId,
    owner: &UserId,
    change: F,
) -> Result<Playlist>
where
    F: FnOnce(Playlist) -> Result<Playlist>,
{
    let mut tx = pool.begin().await?;
    lock_owned(&mut tx, id, owner).await?;

    let current = load(&mut tx, id).await?.ok_or_else(|| not_found(id))?;
    let before = current.songs.clone();
    let playlist = change(current)?;

    let added: Vec<SongId> = playlist
        .songs
        .iter()
        .filter(|song| !before.contains(song))
        .cloned()
        .collect();
    ensure_songs_exist(&mut tx, &added).await?;

    sqlx::query("UPDATE playlists SET name = ?, kind = ? WHERE id = ?")
        .bind(&playlist.name)
        .bind(playlist.kind.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if playlist.songs != before {
        write_songs(&mut tx, id, &playlist.songs).await?;
    }

    tx.commit().await?;

    Ok(playlist)
}

/// Delete a playlist owned by `owner`
pub async fn delete(pool: &SqlitePool, id: &PlaylistId, owner: &UserId) -> Result<()> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ? AND created_by = ?")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}
