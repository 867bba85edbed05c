use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tokens stop verifying 24 hours after they are issued.
const TOKEN_TTL_HOURS: i64 = 24;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's identifier.
    pub sub: Uuid,
    /// Access tag, `"auth"` for tokens issued at signup/login.
    pub access: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Signing and verification keys derived from the shared secret.
///
/// Built once from `Config::jwt_secret` and shared with handlers as `web::Data`.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Signs a token carrying `user_id` and the `access` tag.
///
/// # Returns
/// The compact JWT string, or `AppError::InternalServerError` if encoding fails.
pub fn generate_token(keys: &JwtKeys, user_id: Uuid, access: &str) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expiration = now + chrono::Duration::hours(TOKEN_TTL_HOURS);

    let claims = Claims {
        sub: user_id,
        access: access.to_string(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(&Header::default(), &claims, &keys.encoding)
        .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a token's signature and expiry and decodes its claims.
///
/// Returns `AppError::Unauthorized` if the token is malformed, was signed with
/// another secret, or has expired.
pub fn verify_token(keys: &JwtKeys, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}
