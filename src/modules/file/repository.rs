use crate::{
    api::error,
    modules::file::{model::NewFile, schema::FileEntity},
};

#[async_trait::async_trait]
pub trait FileRepository {
    async fn create(&self, file: &NewFile) -> Result<FileEntity, error::SystemError>;

    async fn find_by_id(&self, file_id: i64) -> Result<Option<FileEntity>, error::SystemError>;

    /// All files of one owner, newest first.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<FileEntity>, error::SystemError>;

    /// Owner's files whose original name contains `needle` as a literal
    /// substring, newest first.
    async fn search_by_name(
        &self,
        owner_id: i64,
        needle: &str,
    ) -> Result<Vec<FileEntity>, error::SystemError>;

    /// Owner-scoped mutators return the affected-row count so callers can
    /// tell "no such row" from "done".
    async fn set_public(
        &self,
        file_id: i64,
        owner_id: i64,
        is_public: bool,
    ) -> Result<u64, error::SystemError>;

    async fn delete(&self, file_id: i64, owner_id: i64) -> Result<u64, error::SystemError>;
}
