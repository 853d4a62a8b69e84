use crate::config::Config;
use crate::domain::models::auth::Claims;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Mints and verifies the HS256 token pair. Access and refresh tokens share
/// the signing key and claim shape; only the lifetime differs.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        let encoding_key = EncodingKey::from_base64_secret(&config.jwt_secret)
            .expect("JWT_SECRET must be valid Base64");
        let decoding_key = DecodingKey::from_base64_secret(&config.jwt_secret)
            .expect("JWT_SECRET must be valid Base64");

        Self {
            encoding_key,
            decoding_key,
            access_ttl: Duration::minutes(config.access_ttl_minutes),
            refresh_ttl: Duration::hours(config.refresh_ttl_hours),
        }
    }

    pub fn generate_access_token(&self, username: &str) -> Result<String, AppError> {
        self.generate_with_ttl(username, self.access_ttl)
    }

    pub fn generate_refresh_token(&self, username: &str) -> Result<String, AppError> {
        self.generate_with_ttl(username, self.refresh_ttl)
    }

    pub fn generate_with_ttl(&self, username: &str, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + ttl).timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("JWT encoding failed: {}", e);
            AppError::Internal
        })
    }

    /// Rejects bad signatures and anything at or past expiry (no leeway).
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
    }
}
