//! JSON-file store rooted at a single application directory.
//!
//! Collections live in one file each and are rewritten atomically through a
//! temp-file-then-rename step. The ledger is the exception: an append-only
//! JSON-lines file, one entry per line.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{BankStore, Result};
use crate::ledger::{
    Account, Announcement, JobConfig, NoticeBoard, PendingTransfer, TransactionEntry,
};

const TMP_SUFFIX: &str = "tmp";
const ACCOUNTS_FILE: &str = "accounts.json";
const LEDGER_FILE: &str = "ledger.jsonl";
const PENDING_FILE: &str = "pending.json";
const NOTICES_FILE: &str = "notices.json";
const ANNOUNCEMENTS_FILE: &str = "announcements.json";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Opens (and creates if needed) the store directory. Without an
    /// explicit root the platform data directory is used.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(default_root);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn read_json<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        write_atomic(&self.path(name), &json)
    }
}

impl BankStore for JsonStore {
    fn load_accounts(&self) -> Result<Vec<Account>> {
        self.read_json(ACCOUNTS_FILE)
    }

    fn save_accounts(&self, accounts: &[Account]) -> Result<()> {
        self.write_json(ACCOUNTS_FILE, accounts)
    }

    fn load_ledger(&self) -> Result<Vec<TransactionEntry>> {
        let path = self.path(LEDGER_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&path)?;
        let mut entries = Vec::new();
        for line in data.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(line)?);
        }
        Ok(entries)
    }

    fn append_ledger_entry(&self, entry: &TransactionEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(LEDGER_FILE))?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    fn load_pending(&self) -> Result<Vec<PendingTransfer>> {
        self.read_json(PENDING_FILE)
    }

    fn save_pending(&self, pending: &[PendingTransfer]) -> Result<()> {
        self.write_json(PENDING_FILE, pending)
    }

    fn load_notices(&self) -> Result<NoticeBoard> {
        self.read_json(NOTICES_FILE)
    }

    fn save_notices(&self, board: &NoticeBoard) -> Result<()> {
        self.write_json(NOTICES_FILE, board)
    }

    fn load_announcements(&self) -> Result<VecDeque<Announcement>> {
        self.read_json(ANNOUNCEMENTS_FILE)
    }

    fn save_announcements(&self, queue: &VecDeque<Announcement>) -> Result<()> {
        self.write_json(ANNOUNCEMENTS_FILE, queue)
    }

    fn load_job_config(&self) -> Result<Option<JobConfig>> {
        let path = self.path(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn save_job_config(&self, config: &JobConfig) -> Result<()> {
        self.write_json(CONFIG_FILE, config)
    }
}

fn default_root() -> PathBuf {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("bancokids")
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
