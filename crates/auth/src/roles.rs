use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A named capability, e.g. `documents.sign`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub code: String,
    pub description: String,
}

impl Permission {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: String::new(),
        }
    }
}

/// A named bundle of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub permissions: HashSet<Permission>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: HashSet::new(),
        }
    }

    pub fn with_permission(mut self, code: impl Into<String>) -> Self {
        self.permissions.insert(Permission::new(code));
        self
    }

    pub fn allows(&self, code: &str) -> bool {
        self.permissions.iter().any(|p| p.code == code)
    }
}

/// Role-name allow list for a protected resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AccessPolicy {
    pub allowed_roles: HashSet<String>,
}

impl AccessPolicy {
    pub fn allowing(roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed_roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn can_access(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.allowed_roles.contains(&r.name))
    }
}
