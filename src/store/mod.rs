//!
//! # Store Abstractions
//!
//! The services are constructed against these two traits rather than a
//! concrete database handle, so the binary can wire a Postgres-backed store
//! while tests run against the in-memory implementation. All methods return
//! `Result<_, AppError>`; "no matching row" is expressed as `Ok(None)` or an
//! empty vector, never as an error.
//!
//! The store is the only shared mutable state in the application. No
//! cross-request coordination happens here: concurrent writes to the same
//! record are last-write-wins.

pub mod memory;
pub mod postgres;

use crate::error::AppError;
use crate::models::{NewUser, Task, User, UserRole};
use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user and returns the stored record with its assigned id.
    /// Fails with `Conflict` if the username is already taken.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn list(&self) -> Result<Vec<User>, AppError>;

    async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, AppError>;

    /// Overwrites the record with `user.id`. Fails with `NotFound` if the id
    /// is absent and `Conflict` if the new username collides.
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a task under its pre-generated id.
    async fn insert(&self, task: Task) -> Result<Task, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    async fn list(&self) -> Result<Vec<Task>, AppError>;

    async fn list_by_assignee(&self, username: &str) -> Result<Vec<Task>, AppError>;

    async fn list_by_creator(&self, username: &str) -> Result<Vec<Task>, AppError>;

    /// Overwrites the record with `task.id`. Fails with `NotFound` if the id
    /// is absent.
    async fn update(&self, task: &Task) -> Result<Task, AppError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Rewrites creator/assignee references from `old` to `new`, so renaming
    /// a user keeps every task pointing at an existing username.
    async fn rename_user(&self, old: &str, new: &str) -> Result<(), AppError>;
}
