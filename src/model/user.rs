use serde::{Deserialize, Serialize};

use super::ids::Id;
use crate::error::{CrmError, CrmResult};

/// Role of a signed-in dealership user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Sales,
    Bdc,
    Manager,
    Admin,
    Viewer,
    Service,
}

impl Role {
    pub const ALL: &'static [Role] = &[
        Role::Sales,
        Role::Bdc,
        Role::Manager,
        Role::Admin,
        Role::Viewer,
        Role::Service,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Sales => "sales",
            Role::Bdc => "bdc",
            Role::Manager => "manager",
            Role::Admin => "admin",
            Role::Viewer => "viewer",
            Role::Service => "service",
        }
    }

    pub fn parse(s: &str) -> CrmResult<Self> {
        let lower = s.trim().to_lowercase();
        Role::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == lower)
            .ok_or_else(|| CrmError::UnknownRole(s.to_string()))
    }

    /// Stored roles that no longer parse fall back to `Sales`.
    pub fn from_db_str(s: &str) -> Self {
        Role::parse(s).unwrap_or(Role::Sales)
    }

    /// Managers, BDC and admins may reorder and move rotation members.
    pub fn can_edit_rotation(&self) -> bool {
        matches!(self, Role::Manager | Role::Bdc | Role::Admin)
    }

    pub fn can_see_all_leads(&self) -> bool {
        matches!(self, Role::Manager | Role::Bdc | Role::Admin)
    }
}

/// Edit permission handed to board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Edit,
    ViewOnly,
}

impl Access {
    pub fn for_role(role: Role) -> Self {
        if role.can_edit_rotation() {
            Access::Edit
        } else {
            Access::ViewOnly
        }
    }

    pub fn can_edit(&self) -> bool {
        *self == Access::Edit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id<User>,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub dept: String,
    pub active: bool,
}

impl User {
    pub fn create(name: String, email: String, role: Role, dept: String) -> Self {
        Self {
            id: Id::generate(),
            name,
            email,
            role,
            dept,
            active: true,
        }
    }

    /// Demo team used to populate an empty database.
    pub fn defaults() -> Vec<User> {
        [
            ("u1", "Morgan H.", "morgan@example.com", Role::Bdc, "BDC"),
            ("u2", "Kyle R.", "kyle@example.com", Role::Bdc, "BDC"),
            ("u4", "Jimmy W.", "jimmy@example.com", Role::Sales, "Sales"),
            ("u6", "Tony W.", "tony@example.com", Role::Sales, "Sales"),
            ("m1", "Dana K.", "dana@example.com", Role::Manager, "Sales"),
        ]
        .iter()
        .map(|(id, name, email, role, dept)| User {
            id: Id::new(*id),
            name: name.to_string(),
            email: email.to_string(),
            role: *role,
            dept: dept.to_string(),
            active: true,
        })
        .collect()
    }
}
