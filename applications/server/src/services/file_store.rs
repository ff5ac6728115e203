/// Media file store - audio files and cover images on disk
use crate::error::{Result, ServerError};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use std::io::SeekFrom;
use std::path::{Component, Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

/// Response body stream of file bytes
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// The kinds of media kept by the store, each in its own directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Song,
    SongCover,
    AlbumCover,
    ArtistCover,
}

impl MediaKind {
    pub const ALL: [MediaKind; 4] = [
        MediaKind::Song,
        MediaKind::SongCover,
        MediaKind::AlbumCover,
        MediaKind::ArtistCover,
    ];

    pub fn subdirectory(self) -> &'static str {
        match self {
            MediaKind::Song => "songs",
            MediaKind::SongCover => "covers/songs",
            MediaKind::AlbumCover => "covers/albums",
            MediaKind::ArtistCover => "covers/artists",
        }
    }
}

/// Read access to stored media
///
/// `name` is a bare file name. Anything else (separators, `..`, absolute
/// paths) is treated as a file that does not exist.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn exists(&self, kind: MediaKind, name: &str) -> bool;

    /// File length in bytes
    async fn size(&self, kind: MediaKind, name: &str) -> Result<u64>;

    /// Stream bytes `start..=end`
    async fn open_range(&self, kind: MediaKind, name: &str, start: u64, end: u64)
        -> Result<ByteStream>;

    /// Stream the whole file
    async fn open(&self, kind: MediaKind, name: &str) -> Result<ByteStream>;
}

pub(crate) fn file_not_found() -> ServerError {
    ServerError::NotFound("File not found!".to_string())
}

/// Single plain path component, nothing that could walk out of a directory
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

#[derive(Debug, Clone)]
pub struct LocalFileStore {
    base_path: PathBuf,
}

impl LocalFileStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Create one directory per media kind
    pub async fn initialize(&self) -> Result<()> {
        for kind in MediaKind::ALL {
            fs::create_dir_all(self.base_path.join(kind.subdirectory())).await?;
        }
        tracing::info!("Media store ready at {}", self.base_path.display());
        Ok(())
    }

    /// Path of an existing regular file inside the kind's directory
    async fn resolve(&self, kind: MediaKind, name: &str) -> Option<PathBuf> {
        if !is_plain_file_name(name) {
            tracing::debug!(name, "Rejecting media name that is not a plain file name");
            return None;
        }

        let dir = fs::canonicalize(self.base_path.join(kind.subdirectory()))
            .await
            .ok()?;
        let path = fs::canonicalize(dir.join(name)).await.ok()?;

        // Symlinks may still point elsewhere
        if !path.starts_with(&dir) {
            tracing::warn!(name, "Media path escapes its directory");
            return None;
        }

        let metadata = fs::metadata(&path).await.ok()?;
        metadata.is_file().then_some(path)
    }

    async fn open_file(&self, kind: MediaKind, name: &str) -> Result<File> {
        let path = self.resolve(kind, name).await.ok_or_else(file_not_found)?;
        Ok(File::open(path).await?)
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn exists(&self, kind: MediaKind, name: &str) -> bool {
        self.resolve(kind, name).await.is_some()
    }

    async fn size(&self, kind: MediaKind, name: &str) -> Result<u64> {
        let path = self.resolve(kind, name).await.ok_or_else(file_not_found)?;
        Ok(fs::metadata(path).await?.len())
    }

    async fn open_range(
        &self,
        kind: MediaKind,
        name: &str,
        start: u64,
        end: u64,
    ) -> Result<ByteStream> {
        if end < start {
            return Err(ServerError::Internal(format!(
                "Invalid byte window {start}-{end}"
            )));
        }

        let mut file = self.open_file(kind, name).await?;
        file.seek(SeekFrom::Start(start)).await?;

        Ok(ReaderStream::new(file.take(end - start + 1)).boxed())
    }

    async fn open(&self, kind: MediaKind, name: &str) -> Result<ByteStream> {
        let file = self.open_file(kind, name).await?;
        Ok(ReaderStream::new(file).boxed())
    }
}
