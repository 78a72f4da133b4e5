use actix_web::{post, web};

use crate::modules::user::model::{LoginModel, LoginResponse, RegisterModel, RegisterResponse};
use crate::modules::user::service::AuthService;
use crate::{
    api::{error, success},
    utils::ValidatedJson,
};

#[post("/register")]
pub async fn register(
    auth_service: web::Data<AuthService>,
    user_data: ValidatedJson<RegisterModel>,
) -> Result<success::Success<RegisterResponse>, error::Error> {
    let id = auth_service.register(user_data.0).await?;
    Ok(success::Success::created(Some(RegisterResponse { id }))
        .message("User registered successfully"))
}

#[post("/login")]
pub async fn login(
    auth_service: web::Data<AuthService>,
    user_data: ValidatedJson<LoginModel>,
) -> Result<success::Success<LoginResponse>, error::Error> {
    let token = auth_service.login(user_data.0).await?;
    Ok(success::Success::ok(Some(LoginResponse { token })).message("Login successful"))
}
