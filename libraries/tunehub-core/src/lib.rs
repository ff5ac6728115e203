//! TuneHub Core
//!
//! Storage-agnostic domain types, validation, and request shaping for the
//! TuneHub music catalog.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `Album`, `Artist`, `Playlist`, `User`
//! - **Query Shaping**: `QuerySpec`, its builder, the parameter parser, and the
//!   `Collection` trait storage backends implement
//! - **Byte Ranges**: `RangeWindow` for partial-content media responses
//! - **Error Handling**: Unified `TuneError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tunehub_core::query::{QueryShaper, ShaperConfig};
//! use tunehub_core::types::Song;
//!
//! let shaper = QueryShaper::new(ShaperConfig::default());
//! let params = vec![
//!     ("rating[gte]".to_string(), "4".to_string()),
//!     ("sort".to_string(), "-rating".to_string()),
//! ];
//! let spec = shaper.shape(&Song::SCHEMA, &params).unwrap();
//! assert_eq!(spec.limit(), 20);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod query;
pub mod range;
pub mod types;

// Re-export commonly used types
pub use error::{Result, TuneError};
pub use query::{Collection, Document, QueryShaper, QuerySpec, ShaperConfig};
pub use range::RangeWindow;

pub use types::{
    Album, AlbumId, Artist, ArtistId, CreateAlbum, CreateArtist, CreatePlaylist, CreateSong,
    Gender, Playlist, PlaylistId, PlaylistKind, Role, SignUp, Song, SongId, UpdatePlaylist, User,
    UserId,
};
