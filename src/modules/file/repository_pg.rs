use crate::{
    api::error,
    modules::file::{model::NewFile, repository::FileRepository, schema::FileEntity},
};

#[derive(Clone)]
pub struct FileRepositoryPg {
    pool: sqlx::PgPool,
}

impl FileRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FileRepository for FileRepositoryPg {
    async fn create(&self, file: &NewFile) -> Result<FileEntity, error::SystemError> {
        let entity = sqlx::query_as::<_, FileEntity>(
            r#"
            INSERT INTO files (owner_id, stored_name, original_name, storage_path, size_bytes, content_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(file.owner_id)
        .bind(&file.stored_name)
        .bind(&file.original_name)
        .bind(&file.storage_path)
        .bind(file.size_bytes)
        .bind(&file.content_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }

    async fn find_by_id(&self, file_id: i64) -> Result<Option<FileEntity>, error::SystemError> {
        let file = sqlx::query_as::<_, FileEntity>("SELECT * FROM files WHERE id = $1")
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(file)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<FileEntity>, error::SystemError> {
        let files = sqlx::query_as::<_, FileEntity>(
            "SELECT * FROM files WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    async fn search_by_name(
        &self,
        owner_id: i64,
        needle: &str,
    ) -> Result<Vec<FileEntity>, error::SystemError> {
        // escape LIKE metacharacters so the needle stays a literal substring
        let escaped =
            needle.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
        let pattern = format!("%{}%", escaped);
        let files = sqlx::query_as::<_, FileEntity>(
            r#"
            SELECT * FROM files
            WHERE owner_id = $1 AND original_name LIKE $2
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    async fn set_public(
        &self,
        file_id: i64,
        owner_id: i64,
        is_public: bool,
    ) -> Result<u64, error::SystemError> {
        let rows =
            sqlx::query("UPDATE files SET is_public = $3 WHERE id = $1 AND owner_id = $2")
                .bind(file_id)
                .bind(owner_id)
                .bind(is_public)
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(rows)
    }

    async fn delete(&self, file_id: i64, owner_id: i64) -> Result<u64, error::SystemError> {
        let rows = sqlx::query("DELETE FROM files WHERE id = $1 AND owner_id = $2")
            .bind(file_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows)
    }
}
