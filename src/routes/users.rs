use crate::{
    auth::{hash_password, issue_auth_token, verify_password, AuthenticatedUser, JwtKeys, AUTH_HEADER},
    error::AppError,
    models::{NewUser, User, UserInput},
    store::UserStore,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Answers with the sanitized user and the token in the `x-auth` header.
fn authenticated(user: &User, token: String) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((AUTH_HEADER, token))
        .json(user)
}

/// Register a new user
///
/// Creates the user, issues an auth token and returns `{id, email}` with the
/// token in the `x-auth` response header. Invalid input, an already registered
/// email, or a store failure answer 400.
#[post("")]
pub async fn signup(
    store: web::Data<dyn UserStore>,
    keys: web::Data<JwtKeys>,
    user_data: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    let input = user_data.into_inner().normalized();
    input.validate()?;

    let new_user = NewUser {
        email: input.email,
        password_hash: hash_password(&input.password)?,
    };
    let mut user = store.create(new_user).await?;
    let token = issue_auth_token(store.get_ref(), &keys, &mut user).await?;

    log::info!("registered user {}", user.id);
    Ok(authenticated(&user, token))
}

/// Login user
///
/// Checks the credentials and issues a fresh auth token. Unknown emails and
/// wrong passwords both answer 400.
#[post("/login")]
pub async fn login(
    store: web::Data<dyn UserStore>,
    keys: web::Data<JwtKeys>,
    login_data: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    let input = login_data.into_inner().normalized();
    input.validate()?;

    let mut user = match store.find_by_email(&input.email).await? {
        Some(user) => user,
        None => return Err(AppError::BadRequest("Invalid credentials".into())),
    };
    if !verify_password(&input.password, &user.password)? {
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    let token = issue_auth_token(store.get_ref(), &keys, &mut user).await?;
    Ok(authenticated(&user, token))
}

/// Returns the user owning the `x-auth` token.
#[get("/me")]
pub async fn me(auth: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(auth.user)
}
