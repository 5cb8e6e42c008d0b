use crate::error::AppError;
use crate::models::{TaskInput, TaskUpdate};
use crate::services::AppState;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskQuery {
    pub created_by: String,
    pub assigned_to: String,
}

#[derive(Debug, Deserialize)]
pub struct ActorQuery {
    pub username: String,
}

/// List every task. Administrative view: no filtering happens here.
#[get("")]
pub async fn get_tasks(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.all_tasks().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Create a task.
///
/// The creator and assignee are passed as `createdBy` and `assignedTo`
/// query parameters; both must name existing users.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    task_data: web::Json<TaskInput>,
    query: web::Query<CreateTaskQuery>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .create_task(task_data.into_inner(), &query.created_by, &query.assigned_to)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// List the tasks assigned to a user.
#[get("/assigned/{username}")]
pub async fn get_tasks_by_assignee(
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.tasks_by_assignee(&username).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// List the tasks created by a user.
#[get("/created/{username}")]
pub async fn get_tasks_by_creator(
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.tasks_by_creator(&username).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// List a user's overdue tasks: due date in the past, not completed.
#[get("/overdue/{username}")]
pub async fn get_overdue_tasks(
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.overdue_tasks(&username).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Per-user task counters.
#[get("/stats/{username}")]
pub async fn get_task_stats(
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let stats = state.tasks.task_stats(&username).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// List all staff members, for populating assignment choices.
#[get("/staff")]
pub async fn get_staff_members(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let staff = state.tasks.staff_members().await?;
    Ok(HttpResponse::Ok().json(staff))
}

/// Fetch a single task. A missing id is a 404.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    match state.tasks.task_by_id(task_id.into_inner()).await? {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Update a task.
///
/// `username` names the acting user, who must be the task's creator or
/// assignee.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
    query: web::Query<ActorQuery>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .update_task(task_id.into_inner(), task_data.into_inner(), &query.username)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Delete a task, under the same creator-or-assignee rule as update.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    query: web::Query<ActorQuery>,
) -> Result<impl Responder, AppError> {
    state
        .tasks
        .delete_task(task_id.into_inner(), &query.username)
        .await?;
    Ok(HttpResponse::Ok().finish())
}
