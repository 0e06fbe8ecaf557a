use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountId;
use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Transfer,
    AdminAdjustment,
    JobTaxBonus,
    JobLottery,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Transfer => "transfer",
            EntryKind::AdminAdjustment => "admin_adjustment",
            EntryKind::JobTaxBonus => "job_tax_bonus",
            EntryKind::JobLottery => "job_lottery",
        };
        f.write_str(label)
    }
}

/// Source or destination of a ledger entry: a member account or the bank
/// itself for job-issued credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    System,
    Account(AccountId),
}

impl Party {
    pub fn account(self) -> Option<AccountId> {
        match self {
            Party::System => None,
            Party::Account(id) => Some(id),
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::System => f.write_str("system"),
            Party::Account(id) => id.fmt(f),
        }
    }
}

/// Immutable record of one balance-affecting event.
///
/// Timestamps come from the wall clock; `seq` breaks ties and defines the
/// causal append order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionEntry {
    pub id: Uuid,
    pub seq: u64,
    pub ts: DateTime<Utc>,
    pub kind: EntryKind,
    pub from: Party,
    pub to: Party,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Selection criteria for ledger queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerFilter {
    pub account: Option<AccountId>,
    pub kind: Option<EntryKind>,
}

impl LedgerFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn for_account(mut self, id: AccountId) -> Self {
        self.account = Some(id);
        self
    }

    pub fn of_kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, entry: &TransactionEntry) -> bool {
        if let Some(id) = self.account {
            if entry.from.account() != Some(id) && entry.to.account() != Some(id) {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if entry.kind != kind {
                return false;
            }
        }
        true
    }
}
