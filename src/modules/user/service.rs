use log::info;
use std::sync::Arc;

use crate::api::error;
use crate::modules::user::model::{InsertUser, LoginModel, RegisterModel};
use crate::modules::user::repository::UserRepository;
use crate::utils::{Claims, hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    jwt_secret: String,
    token_ttl: u64,
}

impl AuthService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        jwt_secret: String,
        token_ttl: u64,
    ) -> Self {
        info!("AuthService initialized with dependencies");
        AuthService { repo, jwt_secret, token_ttl }
    }

    pub async fn register(&self, user: RegisterModel) -> Result<i64, error::SystemError> {
        if self.repo.find_by_email(&user.email).await?.is_some() {
            return Err(error::SystemError::DuplicateIdentity);
        }

        let hash_password = hash_password(&user.password)?;
        let new_user = InsertUser { email: user.email, hash_password };

        match self.repo.create(&new_user).await {
            Ok(id) => Ok(id),
            // the email unique constraint is the authoritative guard; the
            // lookup above is only a fast path
            Err(error::SystemError::Conflict(_)) => Err(error::SystemError::DuplicateIdentity),
            Err(e) => Err(e),
        }
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, user: LoginModel) -> Result<String, error::SystemError> {
        let user_entity = self
            .repo
            .find_by_email(&user.email)
            .await?
            .ok_or(error::SystemError::InvalidCredentials)?;

        let valid = verify_password(&user_entity.hash_password, &user.password)?;
        if !valid {
            return Err(error::SystemError::InvalidCredentials);
        }

        let token = Claims::new(user_entity.id, self.token_ttl).encode(self.jwt_secret.as_ref())?;
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::{DbErrorMeta, SystemError};
    use crate::modules::user::schema::UserEntity;
    use std::sync::Mutex;

    struct MemoryUserRepo {
        users: Mutex<Vec<UserEntity>>,
    }

    impl MemoryUserRepo {
        fn new() -> Self {
            Self { users: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait::async_trait]
    impl UserRepository for MemoryUserRepo {
        async fn find_by_email(
            &self,
            email: &str,
        ) -> Result<Option<UserEntity>, SystemError> {
            Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
        }

        async fn create(&self, user: &InsertUser) -> Result<i64, SystemError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == user.email) {
                return Err(SystemError::Conflict(Some(DbErrorMeta {
                    code: Some("23505".to_string()),
                    constraint: Some("users_email_key".to_string()),
                    message: "duplicate key value violates unique constraint".to_string(),
                })));
            }
            let id = users.len() as i64 + 1;
            users.push(UserEntity {
                id,
                email: user.email.clone(),
                hash_password: user.hash_password.clone(),
                created_at: chrono::Utc::now(),
            });
            Ok(id)
        }
    }

    /// The pre-insert lookup never sees the row, as if a concurrent
    /// registration slipped in between check and insert.
    struct RacyUserRepo {
        inner: MemoryUserRepo,
    }

    #[async_trait::async_trait]
    impl UserRepository for RacyUserRepo {
        async fn find_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<UserEntity>, SystemError> {
            Ok(None)
        }

        async fn create(&self, user: &InsertUser) -> Result<i64, SystemError> {
            self.inner.create(user).await
        }
    }

    fn service(repo: Arc<dyn UserRepository + Send + Sync>) -> AuthService {
        AuthService::with_dependencies(repo, "test-secret".to_string(), 3600)
    }

    fn register_model(email: &str, password: &str) -> RegisterModel {
        RegisterModel { email: email.to_string(), password: password.to_string() }
    }

    fn login_model(email: &str, password: &str) -> LoginModel {
        LoginModel { email: email.to_string(), password: password.to_string() }
    }

    #[tokio::test]
    async fn register_then_login_returns_token_for_same_identity() {
        let svc = service(Arc::new(MemoryUserRepo::new()));

        let id = svc.register(register_model("a@x.com", "secret1")).await.unwrap();
        assert_eq!(id, 1);

        let token = svc.login(login_model("a@x.com", "secret1")).await.unwrap();
        let claims = Claims::decode(&token, b"test-secret").unwrap();
        assert_eq!(claims.sub, id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let svc = service(Arc::new(MemoryUserRepo::new()));

        svc.register(register_model("a@x.com", "secret1")).await.unwrap();
        let err = svc.register(register_model("a@x.com", "other66")).await.unwrap_err();
        assert!(matches!(err, SystemError::DuplicateIdentity));
    }

    #[tokio::test]
    async fn unique_constraint_race_still_reports_duplicate() {
        let svc = service(Arc::new(RacyUserRepo { inner: MemoryUserRepo::new() }));

        svc.register(register_model("a@x.com", "secret1")).await.unwrap();
        let err = svc.register(register_model("a@x.com", "secret1")).await.unwrap_err();
        assert!(matches!(err, SystemError::DuplicateIdentity));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_identically() {
        let svc = service(Arc::new(MemoryUserRepo::new()));
        svc.register(register_model("a@x.com", "secret1")).await.unwrap();

        let wrong_password = svc.login(login_model("a@x.com", "secret2")).await.unwrap_err();
        let unknown_email = svc.login(login_model("b@x.com", "secret1")).await.unwrap_err();

        assert!(matches!(wrong_password, SystemError::InvalidCredentials));
        assert!(matches!(unknown_email, SystemError::InvalidCredentials));
    }
}
