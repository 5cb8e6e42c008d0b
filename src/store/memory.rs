//! In-memory implementation of the store traits.
//!
//! Backs the integration tests and local runs without a database. Uniqueness
//! of usernames is enforced the same way the Postgres store's unique index
//! does, so service behavior is identical across backends.

use crate::error::AppError;
use crate::models::{NewUser, Task, User, UserRole};
use crate::store::{TaskStore, UserStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::RwLock;
use uuid::Uuid;

pub struct MemoryStore {
    users: RwLock<HashMap<i32, User>>,
    tasks: RwLock<HashMap<Uuid, Task>>,
    next_user_id: AtomicI32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            tasks: RwLock::new(HashMap::new()),
            next_user_id: AtomicI32::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        let id = self.next_user_id.fetch_add(1, Ordering::SeqCst);
        let stored = User {
            id,
            username: user.username,
            email: user.email,
            name: user.name,
            role: user.role,
            password_hash: user.password_hash,
            created_at: user.created_at,
        };
        users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.users.read().unwrap().values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self
            .users
            .read()
            .unwrap()
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.write().unwrap();
        if !users.contains_key(&user.id) {
            return Err(AppError::NotFound("User not found".into()));
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.users.write().unwrap().remove(&id).is_some())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert(&self, task: Task) -> Result<Task, AppError> {
        self.tasks.write().unwrap().insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.read().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Task>, AppError> {
        let mut tasks: Vec<Task> = self.tasks.read().unwrap().values().cloned().collect();
        tasks.sort_by_key(|t| t.created_at);
        Ok(tasks)
    }

    async fn list_by_assignee(&self, username: &str) -> Result<Vec<Task>, AppError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .unwrap()
            .values()
            .filter(|t| t.assigned_to == username)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.created_at);
        Ok(tasks)
    }

    async fn list_by_creator(&self, username: &str) -> Result<Vec<Task>, AppError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .unwrap()
            .values()
            .filter(|t| t.created_by == username)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.created_at);
        Ok(tasks)
    }

    async fn update(&self, task: &Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().unwrap();
        if !tasks.contains_key(&task.id) {
            return Err(AppError::NotFound("Task not found".into()));
        }
        tasks.insert(task.id, task.clone());
        Ok(task.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tasks.write().unwrap().remove(&id).is_some())
    }

    async fn rename_user(&self, old: &str, new: &str) -> Result<(), AppError> {
        let mut tasks = self.tasks.write().unwrap();
        for task in tasks.values_mut() {
            if task.created_by == old {
                task.created_by = new.to_string();
            }
            if task.assigned_to == old {
                task.assigned_to = new.to_string();
            }
        }
        Ok(())
    }
}
