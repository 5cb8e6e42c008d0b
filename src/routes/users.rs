use crate::error::AppError;
use crate::models::RegisterRequest;
use crate::services::AppState;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

/// List all users as public summaries.
#[get("")]
pub async fn get_users(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let users = state.users.all_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Create a user account without logging it in.
#[post("")]
pub async fn create_user(
    state: web::Data<AppState>,
    user_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = state.users.create_user(user_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Overwrite a user record. A username change follows through to the
/// creator/assignee references on the user's tasks.
#[put("/{id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    user_id: web::Path<i32>,
    user_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = state
        .users
        .update_user(user_id.into_inner(), user_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Delete a user. Rejected while tasks still reference them.
#[delete("/{id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    user_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    state.users.delete_user(user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}
