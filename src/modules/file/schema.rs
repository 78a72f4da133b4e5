use serde::Serialize;
use sqlx::prelude::FromRow;

/// File metadata entity from database. The storage path stays server-side.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FileEntity {
    pub id: i64,
    pub owner_id: i64,
    pub stored_name: String,
    pub original_name: String,
    #[serde(skip_serializing)]
    pub storage_path: String,
    pub size_bytes: i64,
    pub content_type: String,
    pub is_public: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct FileUploadResponse {
    pub id: i64,
    pub filename: String,
    pub size: i64,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_path_is_never_serialized() {
        let entity = FileEntity {
            id: 1,
            owner_id: 1,
            stored_name: "ab".repeat(16),
            original_name: "note.txt".to_string(),
            storage_path: "./uploads/secret-path".to_string(),
            size_bytes: 10,
            content_type: "text/plain".to_string(),
            is_public: false,
            created_at: chrono::Utc::now(),
        };

        let value = serde_json::to_value(&entity).unwrap();
        assert!(value.get("storage_path").is_none());
        assert_eq!(value["original_name"], "note.txt");
    }
}
