//! Postgres implementation of the store traits, backed by a `sqlx` pool.
//!
//! Uniqueness of `users.username` is enforced by the unique index (see
//! `schema.sql`); the violation surfaces as `AppError::Conflict` through the
//! `From<sqlx::Error>` conversion. Transactional isolation is left to
//! Postgres; no additional locking happens here.

use crate::error::AppError;
use crate::models::{NewUser, Task, User, UserRole};
use crate::store::{TaskStore, UserStore};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, name, role, password_hash, created_at";
const TASK_COLUMNS: &str =
    "id, title, description, status, due_date, created_by, assigned_to, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (username, email, name, role, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            USER_COLUMNS
        );
        let stored = sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.name)
            .bind(user.role)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }

    async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT {} FROM users WHERE role = $1 ORDER BY id",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(role)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users
             SET username = $1, email = $2, name = $3, role = $4, password_hash = $5
             WHERE id = $6
             RETURNING {}",
            USER_COLUMNS
        );
        let updated = sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.name)
            .bind(user.role)
            .bind(&user.password_hash)
            .bind(user.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert(&self, task: Task) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (id, title, description, status, due_date, created_by, assigned_to, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {}",
            TASK_COLUMNS
        );
        let stored = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.due_date)
            .bind(&task.created_by)
            .bind(&task.assigned_to)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list(&self) -> Result<Vec<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks ORDER BY created_at", TASK_COLUMNS);
        let tasks = sqlx::query_as::<_, Task>(&sql).fetch_all(&self.pool).await?;
        Ok(tasks)
    }

    async fn list_by_assignee(&self, username: &str) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE assigned_to = $1 ORDER BY created_at",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(username)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn list_by_creator(&self, username: &str) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE created_by = $1 ORDER BY created_at",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(username)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn update(&self, task: &Task) -> Result<Task, AppError> {
        let sql = format!(
            "UPDATE tasks
             SET title = $1, description = $2, status = $3, due_date = $4,
                 assigned_to = $5, updated_at = $6
             WHERE id = $7
             RETURNING {}",
            TASK_COLUMNS
        );
        let updated = sqlx::query_as::<_, Task>(&sql)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.due_date)
            .bind(&task.assigned_to)
            .bind(task.updated_at)
            .bind(task.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn rename_user(&self, old: &str, new: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE tasks SET created_by = $2 WHERE created_by = $1")
            .bind(old)
            .bind(new)
            .execute(&self.pool)
            .await?;
        sqlx::query("UPDATE tasks SET assigned_to = $2 WHERE assigned_to = $1")
            .bind(old)
            .bind(new)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
