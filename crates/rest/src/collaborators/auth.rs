//! Auth collaborator trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::UserId;

use crate::error::RestError;
use crate::records::{LoginRequest, LoginResponse, RegisterRequest};

/// Remote authentication operations.
///
/// Login yields the bearer token and numeric user id a
/// [`crate::SessionContext`] is constructed from; this crate never stores
/// either anywhere ambient.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Logs a customer in.
    async fn login_user(&self, request: &LoginRequest) -> Result<LoginResponse, RestError>;

    /// Logs an admin in.
    async fn login_admin(&self, request: &LoginRequest) -> Result<LoginResponse, RestError>;

    /// Registers a new customer account.
    async fn register_user(&self, request: &RegisterRequest) -> Result<(), RestError>;
}

#[derive(Debug, Default)]
struct InMemoryAuthState {
    // email -> (password, user id, is_admin)
    accounts: HashMap<String, (String, UserId, bool)>,
    next_user_id: i64,
}

/// In-memory auth service for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthService {
    state: Arc<RwLock<InMemoryAuthState>>,
}

impl InMemoryAuthService {
    /// Creates an empty auth service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account, returning its user id.
    pub fn seed_account(&self, email: &str, password: &str, is_admin: bool) -> UserId {
        let mut state = self.state.write().unwrap();
        state.next_user_id += 1;
        let id = UserId::new(state.next_user_id);
        state
            .accounts
            .insert(email.to_string(), (password.to_string(), id, is_admin));
        id
    }

    fn login(&self, request: &LoginRequest, want_admin: bool) -> Result<LoginResponse, RestError> {
        let state = self.state.read().unwrap();
        match state.accounts.get(&request.user_email) {
            Some((password, id, is_admin))
                if *password == request.user_password && *is_admin == want_admin =>
            {
                Ok(LoginResponse {
                    user_token: format!("TOK-{id}"),
                    user_id: *id,
                })
            }
            _ => Err(RestError::from_status(401, "invalid credentials")),
        }
    }
}

#[async_trait]
impl AuthApi for InMemoryAuthService {
    async fn login_user(&self, request: &LoginRequest) -> Result<LoginResponse, RestError> {
        self.login(request, false)
    }

    async fn login_admin(&self, request: &LoginRequest) -> Result<LoginResponse, RestError> {
        self.login(request, true)
    }

    async fn register_user(&self, request: &RegisterRequest) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        if state.accounts.contains_key(&request.user_email) {
            return Err(RestError::from_status(409, "email already registered"));
        }
        state.next_user_id += 1;
        let id = UserId::new(state.next_user_id);
        state.accounts.insert(
            request.user_email.clone(),
            (request.user_password.clone(), id, false),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            user_email: email.into(),
            user_password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_after_register() {
        let service = InMemoryAuthService::new();
        service
            .register_user(&RegisterRequest {
                user_name: "Asha".into(),
                user_email: "asha@example.com".into(),
                user_password: "pw".into(),
            })
            .await
            .unwrap();

        let response = service
            .login_user(&login("asha@example.com", "pw"))
            .await
            .unwrap();
        assert!(response.user_token.starts_with("TOK-"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let service = InMemoryAuthService::new();
        service.seed_account("a@example.com", "right", false);

        let result = service.login_user(&login("a@example.com", "wrong")).await;
        assert_eq!(result.unwrap_err().status_code(), Some(401));
    }

    #[tokio::test]
    async fn test_customer_cannot_use_admin_login() {
        let service = InMemoryAuthService::new();
        service.seed_account("a@example.com", "pw", false);

        assert!(service.login_admin(&login("a@example.com", "pw")).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let service = InMemoryAuthService::new();
        let request = RegisterRequest {
            user_name: "Asha".into(),
            user_email: "asha@example.com".into(),
            user_password: "pw".into(),
        };
        service.register_user(&request).await.unwrap();

        let result = service.register_user(&request).await;
        assert_eq!(result.unwrap_err().status_code(), Some(409));
    }
}
