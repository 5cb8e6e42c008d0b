use crate::auth::{generate_token, hash_password, verify_password};
use crate::error::AppError;
use crate::models::{AuthResponse, LoginRequest, NewUser, RegisterRequest, UserResponse};
use crate::store::UserStore;
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

/// Authentication operations: login, registration and current-user lookup.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Authenticates a username + password pair and returns a session token
    /// with a public summary of the user.
    ///
    /// An unknown username and a wrong password produce the same
    /// `Authentication` error, so the response does not reveal which part of
    /// the credentials was wrong.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".into()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::Authentication(
                "Invalid username or password".into(),
            ));
        }

        let token = generate_token(&user.username)?;
        log::info!("user {} logged in", user.username);

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    /// Creates a new account and logs it in, returning the same auth result
    /// as [`login`](Self::login). Fails with `Conflict` if the username is
    /// already taken.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
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

        let token = generate_token(&user.username)?;
        log::info!("registered user {} ({:?})", user.username, user.role);

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    /// Looks up a user by username and returns the public summary.
    pub async fn current_user(&self, username: &str) -> Result<UserResponse, AppError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::store::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()))
    }

    fn register_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "password123".to_string(),
            name: username.to_string(),
            role: UserRole::Staff,
        }
    }

    #[actix_rt::test]
    async fn test_register_then_login() {
        std::env::set_var("JWT_SECRET", "test-secret");
        let service = service();

        let registered = service.register(register_request("alice")).await.unwrap();
        assert_eq!(registered.user.username, "alice");
        assert!(!registered.token.is_empty());

        let logged_in = service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.username, "alice");
    }

    #[actix_rt::test]
    async fn test_duplicate_registration_conflicts() {
        std::env::set_var("JWT_SECRET", "test-secret");
        let service = service();

        service.register(register_request("carol")).await.unwrap();
        let second = service.register(register_request("carol")).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
    }

    #[actix_rt::test]
    async fn test_login_with_bad_credentials() {
        std::env::set_var("JWT_SECRET", "test-secret");
        let service = service();
        service.register(register_request("alice")).await.unwrap();

        let wrong_password = service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "not-the-password".to_string(),
            })
            .await;
        assert!(matches!(wrong_password, Err(AppError::Authentication(_))));

        let unknown_user = service
            .login(LoginRequest {
                username: "mallory".to_string(),
                password: "password123".to_string(),
            })
            .await;
        assert!(matches!(unknown_user, Err(AppError::Authentication(_))));
    }

    #[actix_rt::test]
    async fn test_current_user() {
        std::env::set_var("JWT_SECRET", "test-secret");
        let service = service();
        service.register(register_request("alice")).await.unwrap();

        let user = service.current_user("alice").await.unwrap();
        assert_eq!(user.username, "alice");

        let missing = service.current_user("nobody").await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn test_register_rejects_invalid_input() {
        let service = service();
        let mut bad = register_request("ok_user");
        bad.password = "short".to_string();
        assert!(matches!(
            service.register(bad).await,
            Err(AppError::Validation(_))
        ));
    }
}
