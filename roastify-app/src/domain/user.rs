use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Admin,
    Regular,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Regular => "regular",
        }
    }

    pub fn is_privileged(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = std::convert::Infallible;

    /// Unknown role strings degrade to `Regular`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "owner" => Self::Owner,
            "admin" => Self::Admin,
            _ => Self::Regular,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub display_name: String,
    pub username: Option<String>,
    pub role: UserRole,
    pub protection_opt_out: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    pub fn new(id: i64, display_name: String, username: Option<String>) -> Self {
        Self {
            id,
            display_name,
            username,
            role: UserRole::Regular,
            protection_opt_out: false,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_protection_opt_out(mut self, opt_out: bool) -> Self {
        self.protection_opt_out = opt_out;
        self
    }

    /// Owner and admins are shielded from being roasted unless they opted out.
    pub fn is_protected(&self) -> bool {
        self.role.is_privileged() && !self.protection_opt_out
    }
}
