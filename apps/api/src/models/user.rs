use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Visibility;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Applicant,
    Company,
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "APPLICANT" => Ok(UserRole::Applicant),
            "COMPANY" => Ok(UserRole::Company),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// The authenticated caller of an operation, as asserted by the identity gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub user_id: Uuid,
    pub role: UserRole,
    pub is_admin: bool,
}

impl Requester {
    pub fn applicant(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: UserRole::Applicant,
            is_admin: false,
        }
    }

    pub fn company(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: UserRole::Company,
            is_admin: false,
        }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: UserRole::Company,
            is_admin: true,
        }
    }

    /// Admin, or the exact user.
    pub fn is_admin_or(&self, user_id: Uuid) -> bool {
        self.is_admin || self.user_id == user_id
    }

    /// Row scope for list queries: admins see everything, everyone else only
    /// what their role ties them to.
    pub fn visibility(&self) -> Visibility {
        if self.is_admin {
            Visibility::All
        } else {
            match self.role {
                UserRole::Company => Visibility::Company(self.user_id),
                UserRole::Applicant => Visibility::Applicant(self.user_id),
            }
        }
    }
}
