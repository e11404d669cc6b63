use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

pub const MAX_PHOTO_BYTES: usize = 2048 * 1024;

const PHOTO_DIR: &str = "photos";

const ALLOWED_IMAGE_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("photo exceeds the {} KB limit", MAX_PHOTO_BYTES / 1024)]
    TooLarge,
    #[error("photo url does not belong to this store: {0}")]
    ForeignUrl(String),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stores uploaded pet photos under a public directory and maps them to
/// publicly resolvable URLs. The record itself lives upstream; the photo
/// file is the only thing this process owns.
#[derive(Clone)]
pub struct PhotoStorage {
    root: PathBuf,
    public_prefix: String,
}

impl PhotoStorage {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        let public_prefix: String = public_prefix.into();
        Self {
            root: root.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Content-type and size checks, runnable before any side effect.
    /// Returns the file extension to store under.
    pub fn validate(content_type: &str, len: usize) -> Result<&'static str, PhotoError> {
        let ext = ALLOWED_IMAGE_TYPES
            .iter()
            .find(|(mime, _)| *mime == content_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| PhotoError::UnsupportedType(content_type.to_string()))?;
        if len > MAX_PHOTO_BYTES {
            return Err(PhotoError::TooLarge);
        }
        Ok(ext)
    }

    /// Persists the upload under a random name and returns its public URL.
    pub async fn store(&self, content_type: &str, bytes: &[u8]) -> Result<String, PhotoError> {
        let ext = Self::validate(content_type, bytes.len())?;
        let dir = self.root.join(PHOTO_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{ext}", Uuid::new_v4());
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        Ok(format!("{}/{PHOTO_DIR}/{file_name}", self.public_prefix))
    }

    /// Removes the file a previously returned URL points at. A file that
    /// is already gone counts as success.
    pub async fn delete(&self, url: &str) -> Result<(), PhotoError> {
        let relative = url
            .strip_prefix(&self.public_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| PhotoError::ForeignUrl(url.to_string()))?;
        if relative.split('/').any(|segment| segment == "..") {
            return Err(PhotoError::ForeignUrl(url.to_string()));
        }

        match tokio::fs::remove_file(self.root.join(relative)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
