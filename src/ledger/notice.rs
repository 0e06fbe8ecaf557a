use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeTarget {
    All,
    Account(AccountId),
}

impl NoticeTarget {
    pub fn includes(self, account: AccountId) -> bool {
        match self {
            NoticeTarget::All => true,
            NoticeTarget::Account(id) => id == account,
        }
    }
}

impl fmt::Display for NoticeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeTarget::All => f.write_str("all"),
            NoticeTarget::Account(id) => id.fmt(f),
        }
    }
}

/// Message from a privileged author to one account or to everyone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notice {
    pub id: Uuid,
    pub ts: DateTime<Utc>,
    pub author: AccountId,
    pub target: NoticeTarget,
    pub text: String,
}

/// A notice paired with the read state of the viewing account.
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeView {
    pub notice: Notice,
    pub read: bool,
}

/// System-wide celebratory banner, consumed oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Announcement {
    pub id: Uuid,
    pub ts: DateTime<Utc>,
    pub message: String,
}

impl Announcement {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            ts: Utc::now(),
            message: message.into(),
        }
    }
}

/// Notices plus per-account read marks; unread is the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoticeBoard {
    #[serde(default)]
    pub notices: Vec<Notice>,
    #[serde(default)]
    read: HashMap<AccountId, HashSet<Uuid>>,
}

impl NoticeBoard {
    pub fn post(&mut self, author: AccountId, target: NoticeTarget, text: impl Into<String>) -> Uuid {
        let notice = Notice {
            id: Uuid::new_v4(),
            ts: Utc::now(),
            author,
            target,
            text: text.into(),
        };
        let id = notice.id;
        self.notices.push(notice);
        id
    }

    /// Marks a notice read for one account. Returns `false` when the mark
    /// was already present; re-marking is never an error.
    pub fn mark_read(&mut self, account: AccountId, notice: Uuid) -> bool {
        self.read.entry(account).or_default().insert(notice)
    }

    pub fn is_read(&self, account: AccountId, notice: Uuid) -> bool {
        self.read
            .get(&account)
            .map(|seen| seen.contains(&notice))
            .unwrap_or(false)
    }

    /// Notices addressed to everyone or to this account, most recent first.
    pub fn visible_to(&self, account: AccountId) -> Vec<NoticeView> {
        self.notices
            .iter()
            .rev()
            .filter(|notice| notice.target.includes(account))
            .map(|notice| NoticeView {
                notice: notice.clone(),
                read: self.is_read(account, notice.id),
            })
            .collect()
    }
}
