use sqlx::prelude::FromRow;

/// Identity row. Never serialized outward; responses carry only the id or a
/// signed token.
#[allow(unused)]
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub email: String,
    pub hash_password: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
