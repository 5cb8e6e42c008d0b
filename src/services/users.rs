use crate::auth::hash_password;
use crate::error::AppError;
use crate::models::{NewUser, RegisterRequest, User, UserResponse};
use crate::store::{TaskStore, UserStore};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

/// Administrative user CRUD.
///
/// Deleting a user is rejected while any task still references them as
/// creator or assignee, so tasks never point at a missing user. Renaming a
/// user repoints the references on their tasks for the same reason.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    tasks: Arc<dyn TaskStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>) -> Self {
        Self { users, tasks }
    }

    pub async fn all_users(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.users.list().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Creates a user without issuing a session token; otherwise identical
    /// to registration (validation, uniqueness, password hashing).
    pub async fn create_user(&self, request: RegisterRequest) -> Result<UserResponse, AppError> {
        request.validate()?;

        if self
            .users
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username already taken".into()));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .users
            .insert(NewUser {
                username: request.username,
                email: request.email,
                name: request.name,
                role: request.role,
                password_hash,
                created_at: Utc::now(),
            })
            .await?;
        Ok(user.into())
    }

    /// Overwrites a user record. The password is re-hashed from the request;
    /// a username change repoints the creator/assignee references on the
    /// user's tasks.
    pub async fn update_user(
        &self,
        id: i32,
        request: RegisterRequest,
    ) -> Result<UserResponse, AppError> {
        request.validate()?;

        let existing = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let old_username = existing.username.clone();
        let password_hash = hash_password(&request.password)?;

        let updated = self
            .users
            .update(&User {
                id,
                username: request.username,
                email: request.email,
                name: request.name,
                role: request.role,
                password_hash,
                created_at: existing.created_at,
            })
            .await?;

        if updated.username != old_username {
            self.tasks
                .rename_user(&old_username, &updated.username)
                .await?;
            log::info!("user {} renamed to {}", old_username, updated.username);
        }

        Ok(updated.into())
    }

    /// Deletes a user. Rejected with `Conflict` while any task references
    /// the user as creator or assignee.
    pub async fn delete_user(&self, id: i32) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let created = self.tasks.list_by_creator(&user.username).await?;
        let assigned = self.tasks.list_by_assignee(&user.username).await?;
        if !created.is_empty() || !assigned.is_empty() {
            return Err(AppError::Conflict(
                "User is referenced by existing tasks and cannot be deleted".into(),
            ));
        }

        self.users.delete(id).await?;
        log::info!("user {} deleted", user.username);
        Ok(())
    }
}
