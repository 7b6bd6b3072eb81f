use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use url::Url;

use crate::{Error, Result};

/// Path-addressed object storage for attachment bytes
pub trait BlobStore {
    /// Write `bytes` at `path`, replacing any existing blob
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Read the blob at `path`
    fn download(&self, path: &str) -> Result<Vec<u8>>;

    /// Remove the blobs at `paths`. Missing blobs are not an error.
    fn remove(&self, paths: &[&str]) -> Result<()>;

    /// Publicly reachable URL for `path`
    fn public_url(&self, path: &str) -> Result<String>;
}

/// Blob store backed by a local directory.
///
/// Paths are relative, `/`-separated and may not climb out of the root.
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: Option<String>,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            public_base_url: None,
        }
    }

    pub fn with_public_base_url(mut self, base: impl Into<String>) -> Self {
        self.public_base_url = Some(base.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let is_plain = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !is_plain {
            return Err(Error::InvalidPath(path.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

impl BlobStore for FsBlobStore {
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, bytes)?;
        debug!(path, size = bytes.len(), "blob uploaded");
        Ok(())
    }

    fn download(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(path)?;
        Ok(fs::read(full)?)
    }

    fn remove(&self, paths: &[&str]) -> Result<()> {
        for path in paths {
            let full = self.resolve(path)?;
            match fs::remove_file(&full) {
                Ok(()) => debug!(path, "blob removed"),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path, "blob already absent")
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> Result<String> {
        let full = self.resolve(path)?;

        if let Some(base) = &self.public_base_url {
            return Ok(format!("{}/{}", base.trim_end_matches('/'), path));
        }

        let absolute = if full.is_absolute() {
            full
        } else {
            std::env::current_dir()?.join(full)
        };

        Url::from_file_path(&absolute)
            .map(|url| url.to_string())
            .map_err(|_| Error::InvalidPath(absolute.display().to_string()))
    }
}
