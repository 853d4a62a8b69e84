use serde::{Deserialize, Serialize};

/// JWT claims carried by both access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Identity resolved by the gateway's token-validation callback and
/// propagated downstream via the X-User-* headers.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserContext {
    pub id: i64,
    pub username: String,
    pub roles: Vec<String>,
}
