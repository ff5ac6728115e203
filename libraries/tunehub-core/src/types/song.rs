//! Song types

use super::validate::{one_of, optional_text, rating, required_text};
use super::{timestamp, AlbumId, ArtistId, SongId};
use crate::error::{Result, TuneError};
use crate::query::{CollectionSchema, FieldDef};
use serde::{Deserialize, Serialize};

pub const GENRES: &[&str] = &[
    "Pop",
    "Rock",
    "Hip-Hop",
    "Rap",
    "Jazz",
    "Classical",
    "Electronic",
    "Country",
    "R&B",
    "Metal",
    "Folk",
    "Blues",
    "Reggae",
    "Indie",
    "Other",
];

pub const LANGUAGES: &[&str] = &[
    "English",
    "Hindi",
    "Punjabi",
    "Tamil",
    "Spanish",
    "French",
    "German",
    "Japanese",
    "Korean",
    "Other",
];

const FIELDS: &[FieldDef] = &[
    FieldDef::text("id"),
    FieldDef::text("name"),
    FieldDef::text("genre"),
    FieldDef::text("language"),
    FieldDef::text("album_id"),
    FieldDef::list("artist_ids"),
    FieldDef::real("rating"),
    FieldDef::text("cover_image_url").opaque(),
    FieldDef::text("song_url").opaque(),
    FieldDef::text("lyrics_url").opaque(),
    FieldDef::timestamp("released_at"),
    FieldDef::integer("revision").hidden(),
    FieldDef::timestamp("created_at"),
];

/// A song in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub name: String,
    pub genre: String,
    pub language: String,
    pub album_id: Option<AlbumId>,
    pub artist_ids: Vec<ArtistId>,
    pub rating: f64,
    pub cover_image_url: Option<String>,
    pub song_url: Option<String>,
    pub lyrics_url: Option<String>,
    pub released_at: Option<String>,
    pub created_at: String,
}

impl Song {
    pub const SCHEMA: CollectionSchema = CollectionSchema {
        name: "songs",
        entity: "Song",
        fields: FIELDS,
        default_sort: "created_at",
        max_limit: 100,
    };
}

/// Data for creating a new song
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSong {
    pub name: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub album_id: Option<AlbumId>,
    #[serde(default)]
    pub artist_ids: Vec<ArtistId>,
    pub rating: Option<f64>,
    pub cover_image_url: Option<String>,
    pub song_url: Option<String>,
    pub lyrics_url: Option<String>,
    pub released_at: Option<String>,
}

impl CreateSong {
    /// Validate and normalize into a new record
    ///
    /// Referenced albums and artists are checked by storage.
    pub fn into_song(self) -> Result<Song> {
        let name = required_text(self.name, "A song must have a name.", "Song", "name", (4, 40))?;
        let genre = one_of(self.genre, GENRES, "Other", "Genre")?;
        let language = one_of(self.language, LANGUAGES, "Other", "Language")?;
        let rating = rating(self.rating)?;

        let released_at = match self.released_at.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(timestamp::normalize(raw).ok_or_else(|| {
                TuneError::validation(format!("Invalid release date '{raw}'"))
            })?),
            _ => None,
        };

        let mut artist_ids = Vec::with_capacity(self.artist_ids.len());
        for id in self.artist_ids {
            if !artist_ids.contains(&id) {
                artist_ids.push(id);
            }
        }

        Ok(Song {
            id: SongId::generate(),
            name,
            genre,
            language,
            album_id: self.album_id,
            artist_ids,
            rating,
            cover_image_url: optional_text(self.cover_image_url, "Song", "cover image", (1, 255))?,
            song_url: optional_text(self.song_url, "Song", "file", (1, 255))?,
            lyrics_url: optional_text(self.lyrics_url, "Song", "lyrics", (1, 255))?,
            released_at,
            created_at: timestamp::now(),
        })
    }
}
