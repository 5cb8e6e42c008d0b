//!
//! # Services
//!
//! The business logic of the application. Each service receives its store
//! dependencies explicitly at construction; there is no ambient container.
//! Services return `Result<_, AppError>` and never touch HTTP concerns —
//! the route handlers map results and errors onto responses.

pub mod auth;
pub mod tasks;
pub mod users;

pub use auth::AuthService;
pub use tasks::TaskService;
pub use users::UserService;

use crate::store::{TaskStore, UserStore};
use std::sync::Arc;

/// The service bundle handed to the HTTP layer as shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tasks: TaskService,
    pub users: UserService,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>) -> Self {
        Self {
            auth: AuthService::new(users.clone()),
            tasks: TaskService::new(tasks.clone(), users.clone()),
            users: UserService::new(users, tasks),
        }
    }
}
