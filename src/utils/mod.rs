use actix_web::{FromRequest, web};
use argon2::{
    Argon2, PasswordVerifier,
    password_hash::{Error as PasswordHashError, PasswordHash, PasswordHasher, SaltString},
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::api::error;

static ARGON2: LazyLock<Argon2<'static>> = LazyLock::new(Argon2::default);

pub fn hash_password(password: &str) -> Result<String, error::SystemError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = ARGON2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, password: &str) -> Result<bool, error::SystemError> {
    let parsed_hash = PasswordHash::new(hash)?;
    match ARGON2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(error::SystemError::HashError(e)),
    }
}

/// Bearer-token claims. Stateless: once minted a token stays valid until
/// `exp`, there is no server-side revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub iat: u64,
    pub exp: u64,
}

impl Claims {
    pub fn new(sub: i64, ttl_secs: u64) -> Self {
        let now = chrono::Utc::now().timestamp() as u64;
        Claims { sub, iat: now, exp: now + ttl_secs }
    }

    pub fn encode(&self, secret: &[u8]) -> Result<String, error::SystemError> {
        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, self, &EncodingKey::from_secret(secret))?;
        Ok(token)
    }

    /// Pure function of (token, secret, current time). Only the HMAC family
    /// is accepted; tokens signed with any other algorithm are rejected
    /// before the signature is checked.
    pub fn decode(token: &str, secret: &[u8]) -> Result<Self, error::SystemError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0;
        let token_data = decode::<Self>(token, &DecodingKey::from_secret(secret), &validation)?;
        Ok(token_data.claims)
    }
}

pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest for ValidatedJson<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            let json = fut.await.map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            let model = json.into_inner();
            model.validate().map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            Ok(ValidatedJson(model))
        })
    }
}

pub struct ValidatedQuery<T>(pub T);

impl<T> FromRequest for ValidatedQuery<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Query::<T>::from_request(req, payload);

        Box::pin(async move {
            let query = fut.await.map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            query.validate().map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            Ok(ValidatedQuery(query.into_inner()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::SystemError;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn hash_then_verify_accepts_same_password() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password(&hash, "secret1").unwrap());
    }

    #[test]
    fn verify_rejects_different_password() {
        let hash = hash_password("secret1").unwrap();
        assert!(!verify_password(&hash, "secret2").unwrap());
    }

    #[test]
    fn hash_is_not_plaintext() {
        let hash = hash_password("secret1").unwrap();
        assert!(!hash.contains("secret1"));
    }

    #[test]
    fn token_round_trip_returns_subject() {
        let token = Claims::new(42, 3600).encode(SECRET).unwrap();
        let claims = Claims::decode(&token, SECRET).unwrap();
        assert_eq!(claims.sub, 42);
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let token = Claims::new(1, 3600).encode(SECRET).unwrap();
        let (rest, sig) = token.rsplit_once('.').unwrap();
        // flip one base64url character of the signature segment
        let flipped = if sig.as_bytes()[0] == b'A' { 'B' } else { 'A' };
        let mut sig = sig.to_string();
        sig.replace_range(0..1, &flipped.to_string());
        let tampered = format!("{rest}.{sig}");

        let err = Claims::decode(&tampered, SECRET).unwrap_err();
        assert!(matches!(err, SystemError::SignatureInvalid));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = Claims::new(1, 3600).encode(SECRET).unwrap();
        let err = Claims::decode(&token, b"other-secret").unwrap_err();
        assert!(matches!(err, SystemError::SignatureInvalid));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = Claims { sub: 1, iat: now - 120, exp: now - 60 };
        let token = claims.encode(SECRET).unwrap();

        let err = Claims::decode(&token, SECRET).unwrap_err();
        assert!(matches!(err, SystemError::TokenExpired));
    }

    #[test]
    fn non_hs256_token_is_rejected() {
        let header = Header::new(Algorithm::HS384);
        let token =
            encode(&header, &Claims::new(1, 3600), &EncodingKey::from_secret(SECRET)).unwrap();

        let err = Claims::decode(&token, SECRET).unwrap_err();
        assert!(matches!(err, SystemError::UnexpectedAlgorithm));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let err = Claims::decode("not-a-token", SECRET).unwrap_err();
        assert!(matches!(err, SystemError::MalformedToken));
    }
}
