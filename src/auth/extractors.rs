use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;

use crate::auth::{find_by_token, JwtKeys, AUTH_HEADER};
use crate::error::AppError;
use crate::models::User;
use crate::store::UserStore;

/// The user owning the token in the `x-auth` request header.
///
/// Adding this extractor to a handler gates the route: the request is answered
/// with 401 when the header is missing, the token fails verification, or no user
/// holds the token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
}

async fn authenticate(
    store: Option<web::Data<dyn UserStore>>,
    keys: Option<web::Data<JwtKeys>>,
    token: Option<String>,
) -> Result<AuthenticatedUser, AppError> {
    let (store, keys) = match (store, keys) {
        (Some(store), Some(keys)) => (store, keys),
        _ => {
            return Err(AppError::InternalServerError(
                "User store or token keys are not configured".into(),
            ))
        }
    };
    let token = token.ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;

    match find_by_token(store.get_ref(), keys.get_ref(), &token).await? {
        Some(user) => Ok(AuthenticatedUser { user, token }),
        None => Err(AppError::Unauthorized("Unknown token".into())),
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError; // AppError will be converted into ActixError via ResponseError
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(AUTH_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let store = req.app_data::<web::Data<dyn UserStore>>().cloned();
        let keys = req.app_data::<web::Data<JwtKeys>>().cloned();

        Box::pin(async move { authenticate(store, keys, token).await.map_err(ActixError::from) })
    }
}
