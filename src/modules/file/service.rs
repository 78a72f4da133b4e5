use log::info;
use std::sync::Arc;

use crate::api::error;
use crate::modules::file::{
    model::{IngestItem, NewFile, StorageConfig},
    repository::FileRepository,
    schema::FileEntity,
    storage::{DiskStorage, allocate_stored_name},
};

/// Attempts per ingest before giving up on a unique stored name.
const NAME_RETRY_ATTEMPTS: u32 = 3;

#[derive(Clone)]
pub struct FileService {
    repo: Arc<dyn FileRepository + Send + Sync>,
    storage: DiskStorage,
    base_url: String,
    // serializes all deletions on this service instance
    delete_lock: Arc<tokio::sync::Mutex<()>>,
}

impl FileService {
    pub fn with_dependencies(
        repo: Arc<dyn FileRepository + Send + Sync>,
        config: StorageConfig,
    ) -> Self {
        info!("FileService initialized with dependencies");
        FileService {
            repo,
            storage: DiskStorage::new(config.upload_dir),
            base_url: config.base_url,
            delete_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn public_url(&self, file_id: i64) -> String {
        format!("{}/{}", self.base_url, file_id)
    }

    /// Writes the bytes under a freshly allocated name, then records the
    /// metadata. A metadata failure removes the written bytes before the
    /// error surfaces, so a failed ingest leaves nothing behind.
    pub async fn ingest(
        &self,
        owner_id: i64,
        original_name: String,
        content_type: String,
        bytes: Vec<u8>,
    ) -> Result<FileEntity, error::SystemError> {
        self.storage.ensure_root().await?;
        let size_bytes = bytes.len() as i64;

        for _ in 0..NAME_RETRY_ATTEMPTS {
            let stored_name = allocate_stored_name(&original_name)?;
            self.storage.write(&stored_name, &bytes).await?;

            let new_file = NewFile {
                owner_id,
                stored_name: stored_name.clone(),
                original_name: original_name.clone(),
                storage_path: self.storage.path_of(&stored_name).to_string_lossy().into_owned(),
                size_bytes,
                content_type: content_type.clone(),
            };

            match self.repo.create(&new_file).await {
                Ok(entity) => return Ok(entity),
                Err(err) => {
                    self.discard_bytes(&stored_name).await;
                    match err {
                        // the allocator lost the birthday lottery; draw again
                        error::SystemError::Conflict(Some(meta))
                            if meta.is_constraint("files_stored_name_key") =>
                        {
                            continue;
                        }
                        e => return Err(error::SystemError::metadata_failure(e.to_string())),
                    }
                }
            }
        }

        Err(error::SystemError::metadata_failure("could not allocate a unique stored name"))
    }

    /// Best-effort cleanup; its own failure is logged, never surfaced in
    /// place of the primary error.
    async fn discard_bytes(&self, stored_name: &str) {
        if let Err(e) = self.storage.remove(stored_name).await {
            log::error!("failed to roll back stored bytes for {stored_name}: {e}");
        }
    }

    /// Ingests every item in its own task and joins them all; a failing item
    /// does not cancel its siblings, and completed ingests are not rolled
    /// back. On any failure one representative error is returned and the
    /// caller reconciles partial success through a follow-up listing.
    pub async fn ingest_many(
        &self,
        owner_id: i64,
        items: Vec<IngestItem>,
    ) -> Result<Vec<FileEntity>, error::SystemError> {
        let mut handles = Vec::with_capacity(items.len());
        for item in items {
            let service = self.clone();
            handles.push(tokio::spawn(async move {
                service.ingest(owner_id, item.original_name, item.content_type, item.bytes).await
            }));
        }

        let mut records = Vec::with_capacity(handles.len());
        let mut first_error = None;
        for handle in handles {
            match handle.await {
                Ok(Ok(entity)) => records.push(entity),
                Ok(Err(e)) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
                Err(join_err) => {
                    if first_error.is_none() {
                        first_error = Some(error::SystemError::internal(join_err));
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(records),
        }
    }

    pub async fn list_by_owner(
        &self,
        owner_id: i64,
    ) -> Result<Vec<FileEntity>, error::SystemError> {
        self.repo.list_by_owner(owner_id).await
    }

    pub async fn search(
        &self,
        owner_id: i64,
        needle: &str,
    ) -> Result<Vec<FileEntity>, error::SystemError> {
        self.repo.search_by_name(owner_id, needle).await
    }

    /// Absent and present-but-private fail with the same error so callers
    /// cannot probe for existence.
    pub async fn read(
        &self,
        file_id: i64,
        requester_id: i64,
    ) -> Result<FileEntity, error::SystemError> {
        let file = self
            .repo
            .find_by_id(file_id)
            .await?
            .ok_or(error::SystemError::NotFoundOrForbidden)?;

        if file.owner_id != requester_id && !file.is_public {
            return Err(error::SystemError::NotFoundOrForbidden);
        }

        Ok(file)
    }

    /// A record read can race a delete; the missing bytes surface as an I/O
    /// failure here.
    pub async fn read_contents(&self, file: &FileEntity) -> Result<Vec<u8>, error::SystemError> {
        Ok(self.storage.read(&file.stored_name).await?)
    }

    /// Owner-only. Idempotent: an already-public file performs no write and
    /// still yields the reference.
    pub async fn set_public(
        &self,
        file_id: i64,
        requester_id: i64,
    ) -> Result<String, error::SystemError> {
        let file = self
            .repo
            .find_by_id(file_id)
            .await?
            .ok_or(error::SystemError::NotFoundOrForbidden)?;

        if file.owner_id != requester_id {
            return Err(error::SystemError::NotFoundOrForbidden);
        }

        if !file.is_public {
            let rows = self.repo.set_public(file_id, requester_id, true).await?;
            if rows == 0 {
                // the row vanished between lookup and update
                return Err(error::SystemError::NotFoundOrForbidden);
            }
        }

        Ok(self.public_url(file_id))
    }

    /// Owner-only. Bytes are removed first (absence tolerated), then the
    /// row, both under the deletion lock.
    pub async fn delete(&self, file_id: i64, requester_id: i64) -> Result<(), error::SystemError> {
        let file = self
            .repo
            .find_by_id(file_id)
            .await?
            .ok_or(error::SystemError::NotFoundOrForbidden)?;

        if file.owner_id != requester_id {
            return Err(error::SystemError::NotFoundOrForbidden);
        }

        let _guard = self.delete_lock.lock().await;

        self.storage.remove(&file.stored_name).await?;

        let rows = self.repo.delete(file_id, requester_id).await?;
        if rows == 0 {
            // another deletion finished the race after our lookup
            return Err(error::SystemError::metadata_failure("file row already removed"));
        }

        Ok(())
    }
}
