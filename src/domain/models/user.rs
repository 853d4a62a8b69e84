use sqlx::FromRow;

pub const ROLE_USER: &str = "ROLE_USER";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const ROLE_MODERATOR: &str = "ROLE_MODERATOR";

/// Account row. `password_hash` is a bcrypt hash and never leaves the
/// user-service; profile responses use a dedicated DTO.
#[derive(Debug, FromRow, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}
