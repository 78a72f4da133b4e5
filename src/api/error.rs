#![allow(unused)]
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::borrow::Cow;

use crate::ENV;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Unauthorized: {0}")]
    Unauthorized(Cow<'static, str>),
    #[error("Forbidden: {0}")]
    Forbidden(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Conflict: {0}")]
    Conflict(Cow<'static, str>),
    #[error("Internal Server Error")]
    InternalServer,
}

#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub message: Cow<'static, str>,
}

impl Error {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal_server_error() -> Self {
        Self::InternalServer
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let header = ("Access-Control-Allow-Origin", ENV.frontend_url.as_str());
        let mut res = HttpResponse::build(self.status_code());

        res.insert_header(header);
        res.insert_header(("Access-Control-Allow-Credentials", "true"));

        match self {
            // Has Message
            Error::NotFound(msg)
            | Error::Conflict(msg)
            | Error::Unauthorized(msg)
            | Error::BadRequest(msg)
            | Error::Forbidden(msg) => res.json(ErrorBody { message: msg.clone() }),
            // No Message
            Error::InternalServer => {
                res.json(ErrorBody { message: "Internal Server Error".into() })
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    // token errors, one variant per jsonwebtoken failure kind we care about
    #[error("Malformed token")]
    MalformedToken,
    #[error("Unexpected signing algorithm")]
    UnexpectedAlgorithm,
    #[error("Token signature invalid")]
    SignatureInvalid,
    #[error("Token expired")]
    TokenExpired,
    // credential errors
    #[error("Hash Error")]
    HashError(#[from] argon2::password_hash::Error),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("An identity with this email already exists")]
    DuplicateIdentity,
    // file custody errors
    #[error("Entropy source unavailable")]
    EntropyUnavailable,
    #[error("Storage write failure: {0}")]
    WriteFailure(#[from] std::io::Error),
    #[error("Metadata failure: {0}")]
    MetadataFailure(Cow<'static, str>),
    // one kind for both "absent" and "present but not yours"
    #[error("File not found")]
    NotFoundOrForbidden,
    // collaborator errors
    #[error("Database Error : {0}")]
    DatabaseError(Cow<'static, str>),
    #[error("JSON Serialization/Deserialization Error")]
    JsonError(#[from] serde_json::Error),
    #[error("Database Conflict: {0:?}")]
    Conflict(Option<DbErrorMeta>),
    #[error("Internal System Error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

fn conflict_message(meta: &Option<DbErrorMeta>) -> Cow<'static, str> {
    let Some(m) = meta else {
        return "Duplicate value".into();
    };

    let Some(constraint) = &m.constraint else {
        return "Duplicate value".into();
    };

    let field = constraint.split('_').next_back().unwrap_or("value");

    let mut chars = field.chars();
    let field = match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => "Value".to_string(),
    };

    format!("{field} already exists").into()
}

#[derive(Debug)]
pub struct DbErrorMeta {
    pub code: Option<String>,
    pub constraint: Option<String>,
    pub message: String,
}

impl DbErrorMeta {
    /// True when the unique violation came from the given constraint.
    pub fn is_constraint(&self, name: &str) -> bool {
        self.constraint.as_deref() == Some(name)
    }
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            // all token failures render identically to the client
            SystemError::MalformedToken
            | SystemError::UnexpectedAlgorithm
            | SystemError::SignatureInvalid
            | SystemError::TokenExpired => Error::Unauthorized("Token Invalid or Expired".into()),
            SystemError::InvalidCredentials => {
                Error::Unauthorized("Invalid email or password".into())
            }
            SystemError::DuplicateIdentity => {
                Error::Conflict("An identity with this email already exists".into())
            }
            SystemError::NotFoundOrForbidden => Error::NotFound("File not found".into()),
            SystemError::Conflict(meta) => Error::Conflict(conflict_message(&meta)),
            _ => {
                log::error!("Internal Server Error: {:?}", value);
                Error::InternalServer
            }
        }
    }
}

impl From<sqlx::Error> for SystemError {
    fn from(err: sqlx::Error) -> Self {
        log::error!("{:?}", err);
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => {
                    return SystemError::Conflict(Some(DbErrorMeta {
                        code: db_err.code().map(|s| s.to_string()),
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        message: db_err.message().to_string(),
                    }));
                }
                _ => {
                    log::error!("Unhandled DB error: {:?}", db_err);
                    return SystemError::DatabaseError(db_err.message().to_string().into());
                }
            }
        }
        SystemError::InternalError(Box::new(err))
    }
}

impl From<jsonwebtoken::errors::Error> for SystemError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => SystemError::TokenExpired,
            ErrorKind::InvalidSignature => SystemError::SignatureInvalid,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                SystemError::UnexpectedAlgorithm
            }
            _ => SystemError::MalformedToken,
        }
    }
}

impl SystemError {
    pub fn metadata_failure(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::MetadataFailure(msg.into())
    }

    pub fn internal(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InternalError(Box::new(err))
    }
}
