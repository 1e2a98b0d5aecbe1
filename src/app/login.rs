//! Login collaborator
//!
//! The orchestrator only needs a `User` back; how credentials are checked is
//! up to the provider. The bundled directory resolves demo accounts by
//! username and does not verify passwords.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::config::AccountConfig;
use crate::domain::user::User;

/// Credentials as typed on the login screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("No demo account named '{username}'")]
    UnknownAccount { username: String },
    #[error("Username must not be empty")]
    EmptyUsername,
}

/// Resolves credentials to a user
pub trait LoginProvider {
    fn authenticate(&self, credentials: &Credentials) -> Result<User, LoginError>;

    /// Usernames to suggest on the login screen
    fn account_hints(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Demo account directory keyed by lowercase username
#[derive(Debug, Clone)]
pub struct DemoDirectory {
    accounts: HashMap<String, AccountConfig>,
    order: Vec<String>,
}

impl DemoDirectory {
    pub fn new(accounts: &[AccountConfig]) -> Self {
        let order = accounts.iter().map(|a| a.username.clone()).collect();
        let accounts = accounts
            .iter()
            .map(|a| (a.username.to_ascii_lowercase(), a.clone()))
            .collect();
        Self { accounts, order }
    }
}

impl LoginProvider for DemoDirectory {
    fn authenticate(&self, credentials: &Credentials) -> Result<User, LoginError> {
        let username = credentials.username.trim();
        if username.is_empty() {
            return Err(LoginError::EmptyUsername);
        }

        let account = self
            .accounts
            .get(&username.to_ascii_lowercase())
            .ok_or_else(|| LoginError::UnknownAccount {
                username: username.to_string(),
            })?;

        debug!(username, role = %account.role, "demo account resolved");
        Ok(User::new(
            account.name.clone(),
            account.role,
            account.solutions.iter().cloned().collect(),
        ))
    }

    fn account_hints(&self) -> Vec<String> {
        self.order.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DemoConfig;
    use crate::domain::user::Role;

    fn directory() -> DemoDirectory {
        DemoDirectory::new(&DemoConfig::default().accounts)
    }

    #[test]
    fn resolves_account_case_insensitively() {
        let user = directory().authenticate(&Credentials::new(" Admin ")).unwrap();
        assert_eq!(user.role(), Role::Admin);
        assert_eq!(user.assigned_solutions().len(), 4);
    }

    #[test]
    fn password_is_not_checked() {
        let user = directory()
            .authenticate(&Credentials::new("viewer").with_password("anything"))
            .unwrap();
        assert_eq!(user.role(), Role::Viewer);
        assert!(user.assigned_solutions().is_empty());
    }

    #[test]
    fn unknown_and_empty_usernames_fail() {
        assert_eq!(
            directory().authenticate(&Credentials::new("ghost")),
            Err(LoginError::UnknownAccount { username: "ghost".to_string() })
        );
        assert_eq!(
            directory().authenticate(&Credentials::new("  ")),
            Err(LoginError::EmptyUsername)
        );
    }

    #[test]
    fn hints_keep_configured_order() {
        assert_eq!(directory().account_hints(), vec!["admin", "manager", "engineer", "viewer"]);
    }
}
