use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct RegisterModel {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginModel {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

pub struct InsertUser {
    pub email: String,
    pub hash_password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: i64,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}
