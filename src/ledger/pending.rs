use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountId;
use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for PendingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PendingStatus::Pending => "pending",
            PendingStatus::Approved => "approved",
            PendingStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// A transfer held for administrative approval.
///
/// The status moves out of `Pending` exactly once and never back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingTransfer {
    pub id: Uuid,
    pub ts: DateTime<Utc>,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Money,
    pub status: PendingStatus,
}

impl PendingTransfer {
    pub fn new(from: AccountId, to: AccountId, amount: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            ts: Utc::now(),
            from,
            to,
            amount,
            status: PendingStatus::Pending,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == PendingStatus::Pending
    }
}
