//! Integration tests for the playlists slice
//!
//! Tests playlist persistence including:
//! - Song order round-trips through storage
//! - Unknown songs are refused
//! - Population keeps playlist order and leaves artist links out
//! - Owner-scoped edits, serialized under concurrency
//! - Ownership listing and cascade on delete

mod test_helpers;

use test_helpers::*;
use tunehub_core::types::*;
use tunehub_core::TuneError;

async fn playlist_with(pool: &sqlx::SqlitePool, owner: &User, songs: &[&Song]) -> Playlist {
    let playlist = CreatePlaylist {
        name: Some("Mix".to_string()),
        kind: Some("private".to_string()),
        songs: songs.iter().map(|s| s.id.clone()).collect(),
    }
    .into_playlist(owner.id.clone())
    .unwrap();

    tunehub_storage::playlists::create(pool, &playlist)
        .await
        .expect("Failed to create playlist");
    playlist
}

#[tokio::test]
async fn test_create_and_get_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let owner = create_test_user(pool, "owner@example.com").await;
    let a = create_test_song(pool, "First Song", "Pop", 3.0, &minute(1)).await;
    let b = create_test_song(pool, "Second Song", "Pop", 3.0, &minute(2)).await;

    let playlist = playlist_with(pool, &owner, &[&b, &a]).await;

    let stored = tunehub_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, playlist);
    assert_eq!(stored.songs, vec![b.id.clone(), a.id.clone()]);
}

#[tokio::test]
async fn test_unknown_song_is_refused() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let owner = create_test_user(pool, "owner@example.com").await;

    let playlist = CreatePlaylist {
        name: Some("Broken".to_string()),
        kind: Some("public".to_string()),
        songs: vec![SongId::new("missing")],
    }
    .into_playlist(owner.id.clone())
    .unwrap();

    let err = tunehub_storage::playlists::create(pool, &playlist)
        .await
        .unwrap_err();
    assert!(matches!(err, TuneError::Validation(_)));
    assert!(tunehub_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_modify_reorders_and_renames() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let owner = create_test_user(pool, "owner@example.com").await;
    let a = create_test_song(pool, "First Song", "Pop", 3.0, &minute(1)).await;
    let b = create_test_song(pool, "Second Song", "Pop", 3.0, &minute(2)).await;
    let c = create_test_song(pool, "Third Song", "Pop", 3.0, &minute(3)).await;

    let playlist = playlist_with(pool, &owner, &[&a, &b]).await;
    let updated = tunehub_storage::playlists::modify(pool, &playlist.id, &owner.id, |mut p| {
        p.add_songs(&[c.id.clone(), a.id.clone()]);
        p.remove_songs(&[b.id.clone()]);
        p.name = "Renamed".to_string();
        Ok(p)
    })
    .await
    .unwrap();

    let stored = tunehub_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, updated);
    assert_eq!(stored.name, "Renamed");
    assert_eq!(stored.songs, vec![a.id.clone(), c.id.clone()]);
}

#[tokio::test]
async fn test_modify_is_owner_scoped_and_checks_songs() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let owner = create_test_user(pool, "owner@example.com").await;
    let other = create_test_user(pool, "other@example.com").await;
    let a = create_test_song(pool, "First Song", "Pop", 3.0, &minute(1)).await;

    let playlist = playlist_with(pool, &owner, &[&a]).await;

    let err = tunehub_storage::playlists::modify(pool, &playlist.id, &other.id, Ok)
        .await
        .unwrap_err();
    assert!(matches!(err, TuneError::NotFound { .. }));

    let err = tunehub_storage::playlists::modify(pool, &playlist.id, &owner.id, |mut p| {
        p.add_songs(&[SongId::new("missing")]);
        Ok(p)
    })
    .await
    .unwrap_err();
    assert!(matches!(err, TuneError::Validation(_)));

    // A failed change leaves the stored playlist untouched
    let stored = tunehub_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, playlist);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_additions_are_all_kept() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let owner = create_test_user(pool, "owner@example.com").await;
    let playlist = playlist_with(pool, &owner, &[]).await;

    let mut songs = Vec::new();
    for n in 0..8 {
        songs.push(create_test_song(pool, &format!("Song {n}"), "Pop", 3.0, &minute(n)).await);
    }

    let mut tasks = Vec::new();
    for song in &songs {
        let pool = pool.clone();
        let playlist_id = playlist.id.clone();
        let owner_id = owner.id.clone();
        let song_id = song.id.clone();
        tasks.push(tokio::spawn(async move {
            tunehub_storage::playlists::modify(&pool, &playlist_id, &owner_id, |mut p| {
                p.add_songs(&[song_id]);
                Ok(p)
            })
            .await
        }));
    }
    for task in tasks {
        task.await.unwrap().expect("Concurrent edit failed");
    }

    let stored = tunehub_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.songs.len(), songs.len());
    for song in &songs {
        assert!(stored.songs.contains(&song.id));
    }

    // Removals racing each other also all land
    let mut tasks = Vec::new();
    for song in &songs[..4] {
        let pool = pool.clone();
        let playlist_id = playlist.id.clone();
        let owner_id = owner.id.clone();
        let song_id = song.id.clone();
        tasks.push(tokio::spawn(async move {
            tunehub_storage::playlists::modify(&pool, &playlist_id, &owner_id, |mut p| {
                p.remove_songs(&[song_id]);
                Ok(p)
            })
            .await
        }));
    }
    for task in tasks {
        task.await.unwrap().expect("Concurrent edit failed");
    }

    let stored = tunehub_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    let remaining: Vec<SongId> = songs[4..].iter().map(|s| s.id.clone()).collect();
    assert_eq!(stored.songs.len(), remaining.len());
    assert!(remaining.iter().all(|id| stored.songs.contains(id)));
}

#[tokio::test]
async fn test_populate_keeps_order() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let owner = create_test_user(pool, "owner@example.com").await;
    let a = create_test_song(pool, "First Song", "Jazz", 3.0, &minute(1)).await;
    let b = create_test_song(pool, "Second Song", "Rock", 4.0, &minute(2)).await;

    let playlist = playlist_with(pool, &owner, &[&b, &a]).await;
    let populated = tunehub_storage::playlists::populate(pool, playlist)
        .await
        .unwrap();

    let names: Vec<&str> = populated.songs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Second Song", "First Song"]);

    let json = serde_json::to_value(&populated).unwrap();
    assert!(json["songs"][0].get("artist_ids").is_none());
    assert_eq!(json["type"], "private");
}

#[tokio::test]
async fn test_get_by_owner_only_returns_own_playlists() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let alice = create_test_user(pool, "alice@example.com").await;
    let bob = create_test_user(pool, "bob@example.com").await;

    playlist_with(pool, &alice, &[]).await;
    playlist_with(pool, &alice, &[]).await;
    playlist_with(pool, &bob, &[]).await;

    let playlists = tunehub_storage::playlists::get_by_owner(pool, &alice.id)
        .await
        .unwrap();

    assert_eq!(playlists.len(), 2);
    assert!(playlists.iter().all(|p| p.created_by == alice.id));
}

#[tokio::test]
async fn test_delete_playlist_removes_song_links() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let owner = create_test_user(pool, "owner@example.com").await;
    let a = create_test_song(pool, "First Song", "Pop", 3.0, &minute(1)).await;

    let other = create_test_user(pool, "other@example.com").await;

    let playlist = playlist_with(pool, &owner, &[&a]).await;
    let err = tunehub_storage::playlists::delete(pool, &playlist.id, &other.id)
        .await
        .unwrap_err();
    assert!(matches!(err, TuneError::NotFound { .. }));

    tunehub_storage::playlists::delete(pool, &playlist.id, &owner.id)
        .await
        .unwrap();

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM playlist_songs WHERE playlist_id = ?")
        .bind(&playlist.id)
        .fetch_one(pool)
        .await
        .unwrap();
    assert_eq!(links, 0);

    let err = tunehub_storage::playlists::delete(pool, &playlist.id, &owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, TuneError::NotFound { .. }));
}
