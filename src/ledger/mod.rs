//! Domain records of the kids-bank ledger.

pub mod account;
pub mod config;
pub mod notice;
pub mod pending;
pub mod state;
pub mod transaction;

pub use account::{Account, AccountId, Role};
pub use config::JobConfig;
pub use notice::{Announcement, Notice, NoticeBoard, NoticeTarget, NoticeView};
pub use pending::{PendingStatus, PendingTransfer};
pub use state::BankState;
pub use transaction::{EntryKind, LedgerFilter, Party, TransactionEntry};
