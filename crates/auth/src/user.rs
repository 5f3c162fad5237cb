use serde::{Deserialize, Serialize};

use docflow_core::{Entity, UserId};

use crate::roles::Role;

/// Actor identity consumed read-only by the document and payment services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub display_name: String,
    pub is_blocked: bool,
    pub roles: Vec<Role>,
}

impl User {
    pub fn new(id: UserId, login: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
            display_name: display_name.into(),
            is_blocked: false,
            roles: Vec::new(),
        }
    }

    pub fn has_permission(&self, code: &str) -> bool {
        self.roles.iter().any(|r| r.allows(code))
    }

    /// Idempotent: assigning a role the user already has is a no-op.
    pub fn assign_role(&mut self, role: Role) {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
