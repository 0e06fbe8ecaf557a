use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

/// Opaque account identifier, distinct from display names and emails.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Standard,
    Privileged,
}

impl Role {
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Privileged)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Standard => "standard",
            Role::Privileged => "privileged",
        };
        f.write_str(label)
    }
}

/// A member account holding a non-negative balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub display_name: String,
    pub balance: Money,
    pub role: Role,
    #[serde(default)]
    pub banned: bool,
}

impl Account {
    /// Creates a new account with a zero balance.
    pub fn new(display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: AccountId::new(),
            display_name: display_name.into(),
            balance: Money::ZERO,
            role,
            banned: false,
        }
    }

    pub fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }
}
