//! Client logo storage.
//!
//! Handlers depend on the [`LogoStore`] trait so the backing store can be
//! swapped (e.g. for object storage) without touching the upload endpoint.
//! [`LocalLogoStore`] writes to a directory that the router also serves
//! statically.

use std::path::PathBuf;

use async_trait::async_trait;
use helios_core::logo::logo_storage_name;

/// A logo that has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLogo {
    /// Content-addressed file name (`<sha256>.<ext>`).
    pub file_name: String,
    /// Public URL the logo is served from.
    pub url: String,
}

/// Persists uploaded logo bytes.
#[async_trait]
pub trait LogoStore: Send + Sync {
    /// Store `data` under a content-derived name with extension `ext`.
    ///
    /// Storing identical bytes twice yields the same [`StoredLogo`].
    async fn store(&self, data: &[u8], ext: &str) -> std::io::Result<StoredLogo>;
}

/// Local filesystem logo store.
#[derive(Debug, Clone)]
pub struct LocalLogoStore {
    root: PathBuf,
    public_base: String,
}

impl LocalLogoStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }
}

#[async_trait]
impl LogoStore for LocalLogoStore {
    async fn store(&self, data: &[u8], ext: &str) -> std::io::Result<StoredLogo> {
        let file_name = logo_storage_name(data, ext);
        let path = self.root.join(&file_name);

        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::create_dir_all(&self.root).await?;
            tokio::fs::write(&path, data).await?;
            tracing::debug!(path = %path.display(), bytes = data.len(), "Logo written");
        }

        Ok(StoredLogo {
            url: format!("{}/{}", self.public_base, file_name),
            file_name,
        })
    }
}
