pub mod json_backend;
pub mod memory;

use std::collections::VecDeque;
use std::sync::Arc;

use crate::ledger::{
    Account, Announcement, JobConfig, NoticeBoard, PendingTransfer, TransactionEntry,
};

pub type Result<T> = std::result::Result<T, crate::errors::BankError>;

/// Abstraction over the durable store collaborator.
///
/// Every collection has its own load/save pair and writes carry no
/// cross-collection transaction. Callers treat only the ledger append as
/// fatal; all other saves are best-effort.
pub trait BankStore: Send + Sync {
    fn load_accounts(&self) -> Result<Vec<Account>>;
    fn save_accounts(&self, accounts: &[Account]) -> Result<()>;
    fn load_ledger(&self) -> Result<Vec<TransactionEntry>>;
    fn append_ledger_entry(&self, entry: &TransactionEntry) -> Result<()>;
    fn load_pending(&self) -> Result<Vec<PendingTransfer>>;
    fn save_pending(&self, pending: &[PendingTransfer]) -> Result<()>;
    fn load_notices(&self) -> Result<NoticeBoard>;
    fn save_notices(&self, board: &NoticeBoard) -> Result<()>;
    fn load_announcements(&self) -> Result<VecDeque<Announcement>>;
    fn save_announcements(&self, queue: &VecDeque<Announcement>) -> Result<()>;
    fn load_job_config(&self) -> Result<Option<JobConfig>>;
    fn save_job_config(&self, config: &JobConfig) -> Result<()>;
}

impl<S: BankStore> BankStore for Arc<S> {
    fn load_accounts(&self) -> Result<Vec<Account>> {
        (**self).load_accounts()
    }

    fn save_accounts(&self, accounts: &[Account]) -> Result<()> {
        (**self).save_accounts(accounts)
    }

    fn load_ledger(&self) -> Result<Vec<TransactionEntry>> {
        (**self).load_ledger()
    }

    fn append_ledger_entry(&self, entry: &TransactionEntry) -> Result<()> {
        (**self).append_ledger_entry(entry)
    }

    fn load_pending(&self) -> Result<Vec<PendingTransfer>> {
        (**self).load_pending()
    }

    fn save_pending(&self, pending: &[PendingTransfer]) -> Result<()> {
        (**self).save_pending(pending)
    }

    fn load_notices(&self) -> Result<NoticeBoard> {
        (**self).load_notices()
    }

    fn save_notices(&self, board: &NoticeBoard) -> Result<()> {
        (**self).save_notices(board)
    }

    fn load_announcements(&self) -> Result<VecDeque<Announcement>> {
        (**self).load_announcements()
    }

    fn save_announcements(&self, queue: &VecDeque<Announcement>) -> Result<()> {
        (**self).save_announcements(queue)
    }

    fn load_job_config(&self) -> Result<Option<JobConfig>> {
        (**self).load_job_config()
    }

    fn save_job_config(&self, config: &JobConfig) -> Result<()> {
        (**self).save_job_config(config)
    }
}

pub use json_backend::JsonStore;
pub use memory::MemoryStore;
