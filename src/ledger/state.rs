use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::account::{Account, AccountId};
use super::config::JobConfig;
use super::notice::{Announcement, NoticeBoard};
use super::pending::PendingTransfer;
use super::transaction::{EntryKind, LedgerFilter, Party, TransactionEntry};
use crate::money::Money;

/// The single owned aggregate behind the bank: accounts, the append-only
/// transaction log, pending transfers, the notice board, the announcement
/// queue, and the job configuration.
#[derive(Debug, Clone)]
pub struct BankState {
    pub accounts: Vec<Account>,
    pub entries: Vec<TransactionEntry>,
    pub pending: Vec<PendingTransfer>,
    pub board: NoticeBoard,
    pub announcements: VecDeque<Announcement>,
    pub config: JobConfig,
    next_seq: u64,
    updated_at: DateTime<Utc>,
}

impl BankState {
    pub fn new() -> Self {
        Self::from_parts(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            NoticeBoard::default(),
            VecDeque::new(),
            JobConfig::default(),
        )
    }

    pub fn from_parts(
        accounts: Vec<Account>,
        entries: Vec<TransactionEntry>,
        pending: Vec<PendingTransfer>,
        board: NoticeBoard,
        announcements: VecDeque<Announcement>,
        config: JobConfig,
    ) -> Self {
        let next_seq = entries.iter().map(|entry| entry.seq + 1).max().unwrap_or(0);
        Self {
            accounts,
            entries,
            pending,
            board,
            announcements,
            config,
            next_seq,
            updated_at: Utc::now(),
        }
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.id == id)
    }

    pub fn add_account(&mut self, account: Account) -> AccountId {
        let id = account.id;
        self.accounts.push(account);
        self.touch();
        id
    }

    /// The designated root-privileged account: the first privileged account
    /// ever registered. It can never be banned.
    pub fn root_account(&self) -> Option<AccountId> {
        self.accounts
            .iter()
            .find(|account| account.is_privileged())
            .map(|account| account.id)
    }

    pub fn append_entry(
        &mut self,
        kind: EntryKind,
        from: Party,
        to: Party,
        amount: Money,
        note: Option<String>,
    ) -> Uuid {
        let entry = TransactionEntry {
            id: Uuid::new_v4(),
            seq: self.next_seq,
            ts: Utc::now(),
            kind,
            from,
            to,
            amount,
            note,
        };
        self.next_seq += 1;
        let id = entry.id;
        self.entries.push(entry);
        self.touch();
        id
    }

    /// Entries matching the filter, most recent first. The backing vector
    /// keeps append order for causal inspection.
    pub fn query(&self, filter: &LedgerFilter) -> Vec<TransactionEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect()
    }

    pub fn pending(&self, id: Uuid) -> Option<&PendingTransfer> {
        self.pending.iter().find(|transfer| transfer.id == id)
    }

    pub fn pending_mut(&mut self, id: Uuid) -> Option<&mut PendingTransfer> {
        self.pending.iter_mut().find(|transfer| transfer.id == id)
    }

    pub fn add_pending(&mut self, transfer: PendingTransfer) -> Uuid {
        let id = transfer.id;
        self.pending.push(transfer);
        self.touch();
        id
    }

    pub fn enqueue_announcement(&mut self, message: impl Into<String>) -> Uuid {
        let announcement = Announcement::new(message);
        let id = announcement.id;
        self.announcements.push_back(announcement);
        self.touch();
        id
    }

    pub fn pop_announcement(&mut self) -> Option<Announcement> {
        let popped = self.announcements.pop_front();
        if popped.is_some() {
            self.touch();
        }
        popped
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Default for BankState {
    fn default() -> Self {
        Self::new()
    }
}
