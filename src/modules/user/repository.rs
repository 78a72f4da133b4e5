use crate::{api::error, modules::user::model::InsertUser, modules::user::schema::UserEntity};

#[async_trait::async_trait]
pub trait UserRepository {
    /// Exact-match lookup; emails are a case-sensitive unique key.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError>;
    async fn create(&self, user: &InsertUser) -> Result<i64, error::SystemError>;
}
