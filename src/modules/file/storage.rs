use rand::RngCore;
use std::path::{Path, PathBuf};

use crate::api::error;

/// Draws 16 bytes from the OS random source, hex-encodes them and keeps the
/// original extension. The 128-bit space makes collisions negligible; no
/// existence check is made, the record store's unique constraint is the
/// caller's retry signal.
pub fn allocate_stored_name(original_name: &str) -> Result<String, error::SystemError> {
    let mut raw = [0u8; 16];
    rand::rngs::OsRng.try_fill_bytes(&mut raw).map_err(|e| {
        log::error!("entropy source failure: {e}");
        error::SystemError::EntropyUnavailable
    })?;

    let stored = match Path::new(original_name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{}.{}", hex::encode(raw), ext),
        _ => hex::encode(raw),
    };
    Ok(stored)
}

/// Byte storage over a local directory. Names come from
/// `allocate_stored_name`, so entries never collide with user input.
#[derive(Debug, Clone)]
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub async fn write(&self, name: &str, bytes: &[u8]) -> std::io::Result<()> {
        tokio::fs::write(self.path_of(name), bytes).await
    }

    pub async fn read(&self, name: &str) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(self.path_of(name)).await
    }

    /// Idempotent: removing an already-absent entry succeeds.
    pub async fn remove(&self, name: &str) -> std::io::Result<()> {
        match tokio::fs::remove_file(self.path_of(name)).await {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
