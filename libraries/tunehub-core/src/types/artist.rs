//! Artist types

use super::validate::{optional_text, rating, required_text};
use super::{timestamp, ArtistId};
use crate::error::Result;
use crate::query::{CollectionSchema, FieldDef};
use serde::{Deserialize, Serialize};

const FIELDS: &[FieldDef] = &[
    FieldDef::text("id"),
    FieldDef::text("name"),
    FieldDef::text("bio"),
    FieldDef::real("rating"),
    FieldDef::text("cover_image_url").opaque(),
    FieldDef::integer("revision").hidden(),
    FieldDef::timestamp("created_at"),
];

/// A performing artist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    pub bio: Option<String>,
    pub rating: f64,
    pub cover_image_url: Option<String>,
    pub created_at: String,
}

impl Artist {
    pub const SCHEMA: CollectionSchema = CollectionSchema {
        name: "artists",
        entity: "Artist",
        fields: FIELDS,
        default_sort: "created_at",
        max_limit: 100,
    };
}

/// Data for creating a new artist
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateArtist {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub rating: Option<f64>,
    pub cover_image_url: Option<String>,
}

impl CreateArtist {
    pub fn into_artist(self) -> Result<Artist> {
        Ok(Artist {
            id: ArtistId::generate(),
            name: required_text(self.name, "An artist must have a name.", "Artist", "name", (2, 40))?,
            bio: optional_text(self.bio, "Artist", "bio", (5, 100))?,
            rating: rating(self.rating)?,
            cover_image_url: optional_text(self.cover_image_url, "Artist", "cover image", (1, 255))?,
            created_at: timestamp::now(),
        })
    }
}
