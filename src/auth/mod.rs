pub mod extractors;
pub mod password;
pub mod token;

use crate::error::AppError;
use crate::models::{AuthToken, User, AUTH_ACCESS};
use crate::store::UserStore;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims, JwtKeys};

/// Request/response header carrying the auth token.
pub const AUTH_HEADER: &str = "x-auth";

/// Issues a new auth token for `user` and persists it on the user's token list.
///
/// The store appends the token to the stored list, so tokens issued concurrently
/// on other copies of the same user survive. `user.tokens` is updated in place to
/// match. A store failure propagates as `AppError::BadRequest`.
pub async fn issue_auth_token(
    store: &dyn UserStore,
    keys: &JwtKeys,
    user: &mut User,
) -> Result<String, AppError> {
    let token = generate_token(keys, user.id, AUTH_ACCESS)?;
    let auth_token = AuthToken {
        access: AUTH_ACCESS.to_string(),
        token: token.clone(),
    };
    store.push_token(user.id, auth_token.clone()).await?;
    user.tokens.push(auth_token);
    Ok(token)
}

/// Resolves a raw token to the user it was issued to.
///
/// The token is verified first; a token that fails verification is rejected with
/// `AppError::Unauthorized` and the store is never queried. A verified token only
/// resolves if the user still holds it in their token list.
pub async fn find_by_token(
    store: &dyn UserStore,
    keys: &JwtKeys,
    token: &str,
) -> Result<Option<User>, AppError> {
    let claims = verify_token(keys, token)?;
    let user = store.find_by_token(claims.sub, token, AUTH_ACCESS).await?;
    Ok(user)
}
