// src/store/json.rs
// =============================================================================
// File-backed link store.
//
// Reading: the whole file is parsed as a JSON array of link records.
// Anything else (an object, bad JSON, a record without id/title/url) is a
// fatal error: we would rather stop than overwrite a file we don't understand.
//
// Writing: the whole list is replaced in one go. We write to a temporary file
// next to the target, flush it to disk, give it the target's permissions,
// then rename it over the original. A rename within one directory is atomic,
// so readers (and a Ctrl+C in the middle of a save) see either the old list
// or the new one, never half.
//
// If links.json is a symlink, the file it points to is replaced and the
// link itself stays in place.
// =============================================================================

use super::{LinkRecord, LinkStore, StoreError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// A link list stored as a pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    // The file we actually replace: the symlink's target, or the path itself
    async fn resolve_target(&self) -> std::io::Result<PathBuf> {
        match fs::symlink_metadata(&self.path).await {
            Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(&self.path).await,
            _ => Ok(self.path.clone()),
        }
    }

    async fn replace(&self, target: &Path, body: &[u8]) -> std::io::Result<()> {
        let temp = temp_path(target);
        if let Err(e) = write_temp(target, &temp, body).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e);
        }
        if let Err(e) = fs::rename(&temp, target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e);
        }
        Ok(())
    }
}

// Sibling of the target so the final rename never crosses filesystems.
fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "links.json".to_string());
    target.with_file_name(format!(".{}.tmp{}", name, std::process::id()))
}

async fn write_temp(target: &Path, temp: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(temp).await?;
    file.write_all(body).await?;
    file.sync_all().await?;

    // Keep the mode of the file we're replacing (a new file has no mode to keep)
    if let Ok(meta) = fs::metadata(target).await {
        fs::set_permissions(temp, meta.permissions()).await?;
    }
    Ok(())
}

#[async_trait]
impl LinkStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<LinkRecord>, StoreError> {
        let bytes = fs::read(&self.path).await.map_err(|e| self.io_error(e))?;

        let records: Vec<LinkRecord> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), count = records.len(), "loaded link list");
        Ok(records)
    }

    async fn save(&self, records: &[LinkRecord]) -> Result<(), StoreError> {
        // Two-space indentation, same as the dashboard's own save endpoint
        let body = serde_json::to_vec_pretty(records)?;

        let target = self.resolve_target().await.map_err(|e| self.io_error(e))?;
        self.replace(&target, &body)
            .await
            .map_err(|e| self.io_error(e))?;

        // Make the rename durable. The new content is already in place, so
        // this is best effort; directories can't be opened on every platform.
        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if let Ok(dir) = fs::File::open(parent).await {
            let _ = dir.sync_all().await;
        }

        info!(path = %self.path.display(), count = records.len(), "saved link list");
        Ok(())
    }
}
