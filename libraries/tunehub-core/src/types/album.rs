//! Album types

use super::validate::{optional_text, rating, required_text};
use super::{timestamp, AlbumId};
use crate::error::Result;
use crate::query::{CollectionSchema, FieldDef};
use serde::{Deserialize, Serialize};

const FIELDS: &[FieldDef] = &[
    FieldDef::text("id"),
    FieldDef::text("name"),
    FieldDef::real("rating"),
    FieldDef::text("cover_image_url").opaque(),
    FieldDef::integer("revision").hidden(),
    FieldDef::timestamp("created_at"),
];

/// An album
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub rating: f64,
    pub cover_image_url: Option<String>,
    pub created_at: String,
}

impl Album {
    pub const SCHEMA: CollectionSchema = CollectionSchema {
        name: "albums",
        entity: "Album",
        fields: FIELDS,
        default_sort: "created_at",
        max_limit: 100,
    };
}

/// Data for creating a new album
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAlbum {
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub cover_image_url: Option<String>,
}

impl CreateAlbum {
    pub fn into_album(self) -> Result<Album> {
        Ok(Album {
            id: AlbumId::generate(),
            name: required_text(self.name, "An album must have a name.", "Album", "name", (2, 40))?,
            rating: rating(self.rating)?,
            cover_image_url: optional_text(self.cover_image_url, "Album", "cover image", (1, 255))?,
            created_at: timestamp::now(),
        })
    }
}
