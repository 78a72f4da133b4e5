/// Fallback signing secret used when JWT_SECRET is unset.
/// Running with this value in production is a documented risk.
pub const DEV_JWT_SECRET: &str = "default_jwt_secret";

pub struct Env {
    pub jwt_secret: String,
    pub token_expiration: u64,
    pub database_url: String,
    pub upload_dir: String,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
}

impl Env {
    fn new() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET is not set, falling back to the development secret");
            DEV_JWT_SECRET.to_string()
        });

        let token_expiration = std::env::var("TOKEN_EXPIRATION")
            .unwrap_or_else(|_| "86400".to_string())
            .parse::<u64>()
            .expect("TOKEN_EXPIRATION must be a valid u64 integer");

        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");

        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");

        Env { jwt_secret, token_expiration, database_url, upload_dir, frontend_url, ip, port }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
