//! In-memory store for tests and embedders.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{BankStore, Result};
use crate::errors::BankError;
use crate::ledger::{
    Account, Announcement, JobConfig, NoticeBoard, PendingTransfer, TransactionEntry,
};

#[derive(Default)]
struct Collections {
    accounts: Vec<Account>,
    ledger: Vec<TransactionEntry>,
    pending: Vec<PendingTransfer>,
    board: NoticeBoard,
    announcements: VecDeque<Announcement>,
    config: Option<JobConfig>,
}

/// Keeps every collection in memory. Ledger appends can be made to fail on
/// demand to exercise the rollback path.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
    fail_appends: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent ledger appends fail until reset.
    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    pub fn ledger_len(&self) -> usize {
        self.lock().ledger.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Collections> {
        self.inner.lock().expect("memory store mutex poisoned")
    }
}

impl BankStore for MemoryStore {
    fn load_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.lock().accounts.clone())
    }

    fn save_accounts(&self, accounts: &[Account]) -> Result<()> {
        self.lock().accounts = accounts.to_vec();
        Ok(())
    }

    fn load_ledger(&self) -> Result<Vec<TransactionEntry>> {
        Ok(self.lock().ledger.clone())
    }

    fn append_ledger_entry(&self, entry: &TransactionEntry) -> Result<()> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(BankError::Storage("ledger sink unavailable".into()));
        }
        self.lock().ledger.push(entry.clone());
        Ok(())
    }

    fn load_pending(&self) -> Result<Vec<PendingTransfer>> {
        Ok(self.lock().pending.clone())
    }

    fn save_pending(&self, pending: &[PendingTransfer]) -> Result<()> {
        self.lock().pending = pending.to_vec();
        Ok(())
    }

    fn load_notices(&self) -> Result<NoticeBoard> {
        Ok(self.lock().board.clone())
    }

    fn save_notices(&self, board: &NoticeBoard) -> Result<()> {
        self.lock().board = board.clone();
        Ok(())
    }

    fn load_announcements(&self) -> Result<VecDeque<Announcement>> {
        Ok(self.lock().announcements.clone())
    }

    fn save_announcements(&self, queue: &VecDeque<Announcement>) -> Result<()> {
        self.lock().announcements = queue.clone();
        Ok(())
    }

    fn load_job_config(&self) -> Result<Option<JobConfig>> {
        Ok(self.lock().config.clone())
    }

    fn save_job_config(&self, config: &JobConfig) -> Result<()> {
        self.lock().config = Some(config.clone());
        Ok(())
    }
}
