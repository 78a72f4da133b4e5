use crate::{
    api::error,
    modules::user::{model::InsertUser, repository::UserRepository, schema::UserEntity},
};

#[derive(Clone)]
pub struct UserRepositoryPg {
    pool: sqlx::PgPool,
}

impl UserRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryPg {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, user: &InsertUser) -> Result<i64, error::SystemError> {
        let (id,) = sqlx::query_as::<_, (i64,)>(
            "INSERT INTO users (email, hash_password) VALUES ($1, $2) RETURNING id",
        )
        .bind(&user.email)
        .bind(&user.hash_password)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }
}
