use crate::error::AppError;
use crate::models::{LoginRequest, RegisterRequest};
use crate::services::AppState;
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MeQuery {
    pub username: String,
}

/// Authenticate a user
///
/// Returns a session token and a public summary of the user.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.auth.login(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Register a new user
///
/// Creates the account and returns the same auth result as login.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.auth.register(register_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Fetch the public summary of a user by username.
#[get("/me")]
pub async fn me(
    state: web::Data<AppState>,
    query: web::Query<MeQuery>,
) -> Result<impl Responder, AppError> {
    let user = state.auth.current_user(&query.username).await?;
    Ok(HttpResponse::Ok().json(user))
}
