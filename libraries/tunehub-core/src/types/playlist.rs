//! Playlist types

use super::validate::required_text;
use super::{timestamp, AlbumId, PlaylistId, SongId, UserId};
use crate::error::{Result, TuneError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Visibility of a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistKind {
    /// The owner's liked songs; private to the owner
    Liked,
    Public,
    Private,
}

impl PlaylistKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PlaylistKind::Liked => "liked",
            PlaylistKind::Public => "public",
            PlaylistKind::Private => "private",
        }
    }
}

impl FromStr for PlaylistKind {
    type Err = TuneError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "liked" => Ok(PlaylistKind::Liked),
            "public" => Ok(PlaylistKind::Public),
            "private" => Ok(PlaylistKind::Private),
            _ => Err(TuneError::validation(
                "Playlist type must be either liked, public or private.",
            )),
        }
    }
}

/// A user's playlist; `songs` is an ordered set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlaylistKind,
    pub songs: Vec<SongId>,
    pub created_by: UserId,
    pub created_at: String,
}

impl Playlist {
    /// Public playlists are visible to everyone, the rest only to their owner
    pub fn is_visible_to(&self, user: &UserId) -> bool {
        self.kind == PlaylistKind::Public || &self.created_by == user
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.created_by == user
    }

    /// Append songs not already present, keeping order
    pub fn add_songs(&mut self, songs: &[SongId]) {
        for song in songs {
            if !self.songs.contains(song) {
                self.songs.push(song.clone());
            }
        }
    }

    pub fn remove_songs(&mut self, songs: &[SongId]) {
        self.songs.retain(|s| !songs.contains(s));
    }
}

/// Song entry of a populated playlist; artist links are left out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSong {
    pub id: SongId,
    pub name: String,
    pub genre: String,
    pub language: String,
    pub album_id: Option<AlbumId>,
    pub rating: f64,
    pub cover_image_url: Option<String>,
    pub song_url: Option<String>,
    pub lyrics_url: Option<String>,
    pub released_at: Option<String>,
}

/// Playlist with its songs resolved, in playlist order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulatedPlaylist {
    pub id: PlaylistId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlaylistKind,
    pub songs: Vec<PlaylistSong>,
    pub created_by: UserId,
    pub created_at: String,
}

impl PopulatedPlaylist {
    pub fn new(playlist: Playlist, songs: Vec<PlaylistSong>) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name,
            kind: playlist.kind,
            songs,
            created_by: playlist.created_by,
            created_at: playlist.created_at,
        }
    }
}

/// Data for creating a playlist
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePlaylist {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub songs: Vec<SongId>,
}

impl CreatePlaylist {
    pub fn into_playlist(self, owner: UserId) -> Result<Playlist> {
        let name = playlist_name(self.name)?;
        let kind = self
            .kind
            .ok_or_else(|| TuneError::validation("A playlist must have a type."))?
            .parse()?;

        let mut playlist = Playlist {
            id: PlaylistId::generate(),
            name,
            kind,
            songs: Vec::new(),
            created_by: owner,
            created_at: timestamp::now(),
        };
        playlist.add_songs(&self.songs);
        Ok(playlist)
    }
}

/// Partial playlist update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlaylist {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub songs: Option<Vec<SongId>>,
}

impl UpdatePlaylist {
    pub fn apply(self, mut playlist: Playlist) -> Result<Playlist> {
        if self.name.is_some() {
            playlist.name = playlist_name(self.name)?;
        }
        if let Some(kind) = self.kind {
            playlist.kind = kind.parse()?;
        }
        if let Some(songs) = self.songs {
            playlist.songs.clear();
            playlist.add_songs(&songs);
        }
        Ok(playlist)
    }
}

fn playlist_name(name: Option<String>) -> Result<String> {
    required_text(name, "A playlist must have a name.", "Playlist", "name", (1, 40))
}
