use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskStats, TaskStatus, TaskUpdate, UserResponse, UserRole};
use crate::store::{TaskStore, UserStore};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Task lifecycle rules and derived views (overdue listing, per-user
/// statistics, staff listing).
///
/// The one real business invariant lives here: a task may only be modified
/// or deleted by its creator or its assignee, enforced identically in
/// [`update_task`](Self::update_task) and [`delete_task`](Self::delete_task).
///
/// Concurrent updates to the same task are not reconciled: the store
/// overwrites whole records, so the last write wins.
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    users: Arc<dyn UserStore>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>, users: Arc<dyn UserStore>) -> Self {
        Self { tasks, users }
    }

    async fn require_user(&self, username: &str) -> Result<(), AppError> {
        self.users
            .find_by_username(username)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("User not found: {}", username)))
    }

    /// Creates a task. Both `created_by` and `assigned_to` must name
    /// existing users; the status defaults to [`TaskStatus::Pending`] when
    /// the input leaves it out.
    pub async fn create_task(
        &self,
        input: TaskInput,
        created_by: &str,
        assigned_to: &str,
    ) -> Result<Task, AppError> {
        input.validate()?;
        self.require_user(created_by).await?;
        self.require_user(assigned_to).await?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or(TaskStatus::Pending),
            due_date: input.due_date,
            created_by: created_by.to_string(),
            assigned_to: assigned_to.to_string(),
            created_at: now,
            updated_at: now,
        };

        let task = self.tasks.insert(task).await?;
        log::info!(
            "task {} created by {} for {}",
            task.id,
            task.created_by,
            task.assigned_to
        );
        Ok(task)
    }

    /// Every task in the store. Administrative view: this method performs no
    /// authorization filtering; restricting it to admins is the caller's job.
    pub async fn all_tasks(&self) -> Result<Vec<Task>, AppError> {
        self.tasks.list().await
    }

    /// Tasks assigned to `username`. An unknown or task-less user yields an
    /// empty list, not an error.
    pub async fn tasks_by_assignee(&self, username: &str) -> Result<Vec<Task>, AppError> {
        self.tasks.list_by_assignee(username).await
    }

    /// Tasks created by `username`. Empty list when nothing matches.
    pub async fn tasks_by_creator(&self, username: &str) -> Result<Vec<Task>, AppError> {
        self.tasks.list_by_creator(username).await
    }

    /// Looks up a task by id. Absence is an explicit `None`, never an error.
    pub async fn task_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        self.tasks.find_by_id(id).await
    }

    /// Overwrites the mutable fields of a task (title, description, status,
    /// due date, assignee). Only the creator or the assignee may update;
    /// reassigning to a username that does not exist fails with `NotFound`.
    pub async fn update_task(
        &self,
        id: Uuid,
        update: TaskUpdate,
        username: &str,
    ) -> Result<Task, AppError> {
        update.validate()?;

        let mut task = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        self.authorize(&task, username)?;

        if let Some(assignee) = update.assigned_to {
            if assignee != task.assigned_to {
                self.require_user(&assignee).await?;
            }
            task.assigned_to = assignee;
        }

        task.title = update.title;
        task.description = update.description;
        task.status = update.status;
        task.due_date = update.due_date;
        task.updated_at = Utc::now();

        self.tasks.update(&task).await
    }

    /// Deletes a task under the same creator-or-assignee rule as
    /// [`update_task`](Self::update_task).
    pub async fn delete_task(&self, id: Uuid, username: &str) -> Result<(), AppError> {
        let task = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        self.authorize(&task, username)?;

        self.tasks.delete(id).await?;
        log::info!("task {} deleted by {}", id, username);
        Ok(())
    }

    /// Tasks assigned to `username` whose due date is strictly before now
    /// and which are not completed. Computed at call time; there is no
    /// cached overdue flag.
    pub async fn overdue_tasks(&self, username: &str) -> Result<Vec<Task>, AppError> {
        let now = Utc::now();
        let tasks = self.tasks.list_by_assignee(username).await?;
        Ok(tasks.into_iter().filter(|t| t.is_overdue_at(now)).collect())
    }

    /// Per-user counters derived by scanning the user's assigned tasks.
    /// `total = pending + in_progress + completed`; `overdue` overlaps the
    /// non-completed buckets.
    pub async fn task_stats(&self, username: &str) -> Result<TaskStats, AppError> {
        let now = Utc::now();
        let tasks = self.tasks.list_by_assignee(username).await?;

        let mut stats = TaskStats {
            total: tasks.len() as u64,
            pending: 0,
            in_progress: 0,
            completed: 0,
            overdue: 0,
        };
        for task in &tasks {
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
            if task.is_overdue_at(now) {
                stats.overdue += 1;
            }
        }
        Ok(stats)
    }

    /// All users with role `STAFF`, for populating assignment choices.
    pub async fn staff_members(&self) -> Result<Vec<UserResponse>, AppError> {
        let staff = self.users.list_by_role(UserRole::Staff).await?;
        Ok(staff.into_iter().map(UserResponse::from).collect())
    }

    fn authorize(&self, task: &Task, username: &str) -> Result<(), AppError> {
        if task.created_by != username && task.assigned_to != username {
            return Err(AppError::Authorization(
                "Only the creator or assignee can modify this task".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, RegisterRequest};
    use crate::services::UserService;
    use crate::store::MemoryStore;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    struct Fixture {
        tasks: TaskService,
        #[allow(dead_code)]
        users: UserService,
    }

    async fn fixture_with_users(usernames: &[&str]) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let user_store: Arc<dyn UserStore> = store.clone();
        let task_store: Arc<dyn TaskStore> = store;

        for username in usernames {
            user_store
                .insert(NewUser {
                    username: username.to_string(),
                    email: format!("{}@example.com", username),
                    name: username.to_string(),
                    role: UserRole::Staff,
                    password_hash: "hash".to_string(),
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }

        Fixture {
            tasks: TaskService::new(task_store.clone(), user_store.clone()),
            users: UserService::new(user_store, task_store),
        }
    }

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: None,
            status: None,
            due_date: None,
        }
    }

    fn update_from(task: &Task) -> TaskUpdate {
        TaskUpdate {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            due_date: task.due_date,
            assigned_to: None,
        }
    }

    #[actix_rt::test]
    async fn test_create_task_defaults_to_pending() {
        let f = fixture_with_users(&["alice", "bob"]).await;
        let task = f
            .tasks
            .create_task(input("Write report"), "alice", "bob")
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_by, "alice");
        assert_eq!(task.assigned_to, "bob");
    }

    #[actix_rt::test]
    async fn test_create_task_requires_existing_users() {
        let f = fixture_with_users(&["alice"]).await;

        let missing_assignee = f.tasks.create_task(input("T"), "alice", "ghost").await;
        assert!(matches!(missing_assignee, Err(AppError::NotFound(_))));

        let missing_creator = f.tasks.create_task(input("T"), "ghost", "alice").await;
        assert!(matches!(missing_creator, Err(AppError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn test_task_by_id_absent_is_none() {
        let f = fixture_with_users(&[]).await;
        let found = f.tasks.task_by_id(Uuid::new_v4()).await.unwrap();
        assert!(found.is_none());
    }

    #[actix_rt::test]
    async fn test_update_requires_creator_or_assignee() {
        let f = fixture_with_users(&["alice", "bob", "mallory"]).await;
        let task = f
            .tasks
            .create_task(input("T1"), "alice", "bob")
            .await
            .unwrap();

        // Mallory is neither creator nor assignee.
        let denied = f
            .tasks
            .update_task(task.id, update_from(&task), "mallory")
            .await;
        assert!(matches!(denied, Err(AppError::Authorization(_))));

        let denied = f.tasks.delete_task(task.id, "mallory").await;
        assert!(matches!(denied, Err(AppError::Authorization(_))));

        // Both the creator and the assignee may update.
        f.tasks
            .update_task(task.id, update_from(&task), "alice")
            .await
            .unwrap();
        f.tasks
            .update_task(task.id, update_from(&task), "bob")
            .await
            .unwrap();
    }

    #[actix_rt::test]
    async fn test_update_missing_task_is_not_found() {
        let f = fixture_with_users(&["alice"]).await;
        let update = TaskUpdate {
            title: "T".to_string(),
            description: None,
            status: TaskStatus::Pending,
            due_date: None,
            assigned_to: None,
        };
        let result = f.tasks.update_task(Uuid::new_v4(), update, "alice").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let result = f.tasks.delete_task(Uuid::new_v4(), "alice").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn test_reassign_to_unknown_user_fails() {
        let f = fixture_with_users(&["alice", "bob"]).await;
        let task = f
            .tasks
            .create_task(input("T1"), "alice", "bob")
            .await
            .unwrap();

        let mut update = update_from(&task);
        update.assigned_to = Some("ghost".to_string());
        let result = f.tasks.update_task(task.id, update, "alice").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        // The failed reassignment must not have touched the task.
        let unchanged = f.tasks.task_by_id(task.id).await.unwrap().unwrap();
        assert_eq!(unchanged.assigned_to, "bob");
    }

    #[actix_rt::test]
    async fn test_overdue_is_subset_of_assigned_and_excludes_completed() {
        let f = fixture_with_users(&["alice", "bob"]).await;
        let past = Some(Utc::now() - Duration::days(1));
        let future = Some(Utc::now() + Duration::days(1));

        let overdue = f
            .tasks
            .create_task(
                TaskInput {
                    title: "Overdue".to_string(),
                    description: None,
                    status: None,
                    due_date: past,
                },
                "alice",
                "bob",
            )
            .await
            .unwrap();
        f.tasks
            .create_task(
                TaskInput {
                    title: "On time".to_string(),
                    description: None,
                    status: None,
                    due_date: future,
                },
                "alice",
                "bob",
            )
            .await
            .unwrap();
        let done = f
            .tasks
            .create_task(
                TaskInput {
                    title: "Done late".to_string(),
                    description: None,
                    status: Some(TaskStatus::Completed),
                    due_date: past,
                },
                "alice",
                "bob",
            )
            .await
            .unwrap();

        let overdue_list = f.tasks.overdue_tasks("bob").await.unwrap();
        let assigned: Vec<Uuid> = f
            .tasks
            .tasks_by_assignee("bob")
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();

        assert_eq!(overdue_list.len(), 1);
        assert_eq!(overdue_list[0].id, overdue.id);
        assert!(overdue_list.iter().all(|t| assigned.contains(&t.id)));
        assert!(!overdue_list.iter().any(|t| t.id == done.id));
    }

    #[actix_rt::test]
    async fn test_stats_reconcile() {
        let f = fixture_with_users(&["alice", "bob"]).await;
        let past = Some(Utc::now() - Duration::hours(2));

        for (status, due) in [
            (None, None),
            (None, past),
            (Some(TaskStatus::InProgress), None),
            (Some(TaskStatus::Completed), past),
            (Some(TaskStatus::Completed), None),
        ] {
            f.tasks
                .create_task(
                    TaskInput {
                        title: "T".to_string(),
                        description: None,
                        status,
                        due_date: due,
                    },
                    "alice",
                    "bob",
                )
                .await
                .unwrap();
        }

        let stats = f.tasks.task_stats("bob").await.unwrap();
        assert_eq!(
            stats,
            TaskStats {
                total: 5,
                pending: 2,
                in_progress: 1,
                completed: 2,
                overdue: 1,
            }
        );
        assert_eq!(
            stats.total,
            stats.pending + stats.in_progress + stats.completed
        );

        // A user with no tasks gets zeros, not an error.
        let empty = f.tasks.task_stats("alice").await.unwrap();
        assert_eq!(empty.total, 0);
    }

    #[actix_rt::test]
    async fn test_completed_task_never_overdue_scenario() {
        // alice creates T1 for bob; bob completes it; stats show it and the
        // overdue list excludes it despite the past due date.
        let f = fixture_with_users(&["alice", "bob"]).await;
        let t1 = f
            .tasks
            .create_task(
                TaskInput {
                    title: "T1".to_string(),
                    description: None,
                    status: None,
                    due_date: Some(Utc::now() - Duration::days(2)),
                },
                "alice",
                "bob",
            )
            .await
            .unwrap();

        let mut update = update_from(&t1);
        update.status = TaskStatus::Completed;
        f.tasks.update_task(t1.id, update, "bob").await.unwrap();

        let stats = f.tasks.task_stats("bob").await.unwrap();
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.overdue, 0);

        let overdue = f.tasks.overdue_tasks("bob").await.unwrap();
        assert!(overdue.is_empty());
    }

    #[actix_rt::test]
    async fn test_last_write_wins_on_sequential_updates() {
        let f = fixture_with_users(&["alice", "bob"]).await;
        let task = f
            .tasks
            .create_task(input("T1"), "alice", "bob")
            .await
            .unwrap();

        let mut first = update_from(&task);
        first.title = "Alice's title".to_string();
        f.tasks.update_task(task.id, first, "alice").await.unwrap();

        let mut second = update_from(&task);
        second.title = "Bob's title".to_string();
        f.tasks.update_task(task.id, second, "bob").await.unwrap();

        let stored = f.tasks.task_by_id(task.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Bob's title");
    }

    #[actix_rt::test]
    async fn test_staff_members_excludes_admins() {
        let store = Arc::new(MemoryStore::new());
        let user_store: Arc<dyn UserStore> = store.clone();
        let task_store: Arc<dyn TaskStore> = store;
        let users = UserService::new(user_store.clone(), task_store.clone());
        let tasks = TaskService::new(task_store, user_store);

        users
            .create_user(RegisterRequest {
                username: "boss".to_string(),
                email: "boss@example.com".to_string(),
                password: "password123".to_string(),
                name: "Boss".to_string(),
                role: UserRole::Admin,
            })
            .await
            .unwrap();
        users
            .create_user(RegisterRequest {
                username: "worker".to_string(),
                email: "worker@example.com".to_string(),
                password: "password123".to_string(),
                name: "Worker".to_string(),
                role: UserRole::Staff,
            })
            .await
            .unwrap();

        let staff = tasks.staff_members().await.unwrap();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].username, "worker");
    }
}
