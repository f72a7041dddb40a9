use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Staff roles for RBAC in the admin panel.
///
/// The order of variants matters: it defines the privilege hierarchy.
/// `Manager` is the least privileged, `Super` is the most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can manage content and edit team profiles.
    Manager = 0,
    /// Can additionally create team members.
    Admin = 1,
    /// Can additionally change roles and delete team members.
    Super = 2,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Super, Role::Admin, Role::Manager];

    /// Roles that may be given to a newly created member.
    pub const ASSIGNABLE_ON_CREATE: [Role; 2] = [Role::Admin, Role::Manager];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Super => "super",
            Role::Admin => "admin",
            Role::Manager => "manager",
        }
    }

    /// Human-readable label used in selects and tables.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Super => "Super Admin",
            Role::Admin => "Admin",
            Role::Manager => "Manager",
        }
    }

    /// Parse a role from a string (case-insensitive).
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "super" => Some(Role::Super),
            "admin" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            _ => None,
        }
    }

    /// Returns `true` if `self` has at least the required role.
    pub fn has_access(&self, required: Role) -> bool {
        *self >= required
    }

    pub fn can_create_members(&self) -> bool {
        self.has_access(Role::Admin)
    }

    pub fn can_delete_members(&self) -> bool {
        *self == Role::Super
    }

    pub fn can_change_roles(&self) -> bool {
        *self == Role::Super
    }
}

/// Deserialize a stored role leniently: anything that is not a recognized
/// role becomes `None` instead of failing the whole document.
pub fn deserialize_role_lenient<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Role::from_str_ci))
}

/// A signed-in staff member whose role has been verified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffUser {
    /// Identity-service UID (also the author document id).
    pub uid: String,
    pub email: String,
    /// Display name from the author profile.
    pub name: String,
    pub role: Role,
}
