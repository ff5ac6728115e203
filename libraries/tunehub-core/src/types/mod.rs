mod album;
mod artist;
mod ids;
mod playlist;
mod song;
mod user;
mod validate;

pub mod timestamp;

pub use album::{Album, CreateAlbum};
pub use artist::{Artist, CreateArtist};
pub use ids::{AlbumId, ArtistId, PlaylistId, SongId, UserId};
pub use playlist::{
    CreatePlaylist, Playlist, PlaylistKind, PlaylistSong, PopulatedPlaylist, UpdatePlaylist,
};
pub use song::{CreateSong, Song, GENRES, LANGUAGES};
pub use user::{
    issued_before_password_change, normalize_email, validate_password, Gender, NewUser, Role,
    SignUp, TokenDigest, User,
};
