//! Signed-in user identity as supplied by the login collaborator

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::solutions::SolutionSet;

/// Role of a demo user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Engineer,
    Operator,
    Viewer,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Engineer => "engineer",
            Role::Operator => "operator",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signed-in user
///
/// Immutable once built; a new login replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    name: String,
    role: Role,
    assigned_solutions: SolutionSet,
}

impl User {
    /// Creates a new user
    ///
    /// # Arguments
    /// * `name` - Display name
    /// * `role` - Role used for page gating
    /// * `assigned_solutions` - Solutions enabled for this user on login
    pub fn new(name: impl Into<String>, role: Role, assigned_solutions: SolutionSet) -> Self {
        Self {
            name: name.into(),
            role,
            assigned_solutions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn assigned_solutions(&self) -> &SolutionSet {
        &self.assigned_solutions
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
