pub mod task;
pub mod user;

pub use task::{Task, TaskInput, TaskStats, TaskStatus, TaskUpdate};
pub use user::{AuthResponse, LoginRequest, NewUser, RegisterRequest, User, UserResponse, UserRole};
