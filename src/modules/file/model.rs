use serde::Deserialize;
use std::path::PathBuf;
use validator::Validate;

/// New file metadata to insert into database
#[derive(Debug, Clone)]
pub struct NewFile {
    pub owner_id: i64,
    pub stored_name: String,
    pub original_name: String,
    pub storage_path: String,
    pub size_bytes: i64,
    pub content_type: String,
}

/// One item of a (possibly multi-file) ingest request.
#[derive(Debug)]
pub struct IngestItem {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// File storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { upload_dir: PathBuf::from("./uploads"), base_url: "/api/files".to_string() }
    }
}

#[derive(Deserialize, Validate)]
pub struct ListFilesQuery {
    pub search: Option<String>,
}
