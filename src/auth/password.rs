use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

use crate::error::AppError;

/// Hashes a signup password for storage on the user document.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, DEFAULT_COST)?)
}

/// Checks a login password against the stored hash.
///
/// A stored value that is not a bcrypt hash never matches, so login answers
/// "invalid credentials" for it instead of a server error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    match verify(password, stored_hash) {
        Ok(matches) => Ok(matches),
        Err(BcryptError::InvalidHash(_))
        | Err(BcryptError::InvalidPrefix(_))
        | Err(BcryptError::InvalidCost(_))
        | Err(BcryptError::InvalidBase64(_))
        | Err(BcryptError::InvalidSaltLen(_))
        | Err(BcryptError::CostNotAllowed(_)) => {
            log::warn!("stored password is not a bcrypt hash");
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}
