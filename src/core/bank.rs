//! Owning facade over the bank state, storage, and job scheduler.
//!
//! All balance mutations are serialized through the state mutex; the debit
//! and credit of one transfer are never separated by another mutation.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::actor::Actor;
use crate::core::picker::{RandomPicker, WinnerPicker};
use crate::core::scheduler::{self, SchedulerHandle};
use crate::core::services::{
    AccountService, JobReport, JobService, NoticeService, Resolution, TransferOutcome,
    TransferService,
};
use crate::errors::{BankError, Result};
use crate::ledger::{
    Account, AccountId, Announcement, BankState, JobConfig, LedgerFilter, NoticeTarget,
    NoticeView, PendingTransfer, Role, TransactionEntry,
};
use crate::money::Money;
use crate::storage::BankStore;

pub struct Bank {
    state: Mutex<BankState>,
    store: Box<dyn BankStore>,
    picker: Mutex<Box<dyn WinnerPicker>>,
    job_gate: Mutex<()>,
    scheduler: OnceCell<SchedulerHandle>,
}

impl Bank {
    /// Loads all collections from the store and assembles the service.
    pub fn open(store: Box<dyn BankStore>) -> Result<Self> {
        Self::open_with_picker(store, Box::new(RandomPicker))
    }

    pub fn open_with_picker(
        store: Box<dyn BankStore>,
        picker: Box<dyn WinnerPicker>,
    ) -> Result<Self> {
        let accounts = store.load_accounts()?;
        let entries = store.load_ledger()?;
        let pending = store.load_pending()?;
        let board = store.load_notices()?;
        let announcements = store.load_announcements()?;
        let config = store.load_job_config()?.unwrap_or_default();
        config.validate()?;
        info!(
            accounts = accounts.len(),
            entries = entries.len(),
            pending = pending.len(),
            "bank state loaded"
        );
        let state = BankState::from_parts(accounts, entries, pending, board, announcements, config);
        Ok(Self {
            state: Mutex::new(state),
            store,
            picker: Mutex::new(picker),
            job_gate: Mutex::new(()),
            scheduler: OnceCell::new(),
        })
    }

    /// Arms the recurring job timer. The job runs once immediately, then on
    /// every interval until [`Bank::shutdown`].
    pub fn start_scheduler(bank: &Arc<Bank>) -> Result<()> {
        let handle = scheduler::spawn(bank);
        if let Err(handle) = bank.scheduler.set(handle) {
            handle.shutdown();
            return Err(BankError::InvalidInput(
                "job scheduler is already running".into(),
            ));
        }
        Ok(())
    }

    /// Stops the job timer, if one was started. In-flight runs finish first.
    pub fn shutdown(&self) {
        if let Some(handle) = self.scheduler.get() {
            handle.shutdown();
        }
    }

    fn state(&self) -> MutexGuard<'_, BankState> {
        self.state.lock().expect("bank state mutex poisoned")
    }

    // ----- accounts -----

    pub fn register_account(&self, display_name: &str, role: Role) -> Result<AccountId> {
        let mut state = self.state();
        let id = AccountService::register(&mut state, display_name, role)?;
        self.persist_accounts(&state);
        Ok(id)
    }

    pub fn account(&self, id: AccountId) -> Result<Account> {
        self.state()
            .account(id)
            .cloned()
            .ok_or(BankError::AccountNotFound(id))
    }

    /// Snapshot of all accounts in creation order.
    pub fn accounts(&self) -> Vec<Account> {
        self.state().accounts.clone()
    }

    pub fn set_banned(&self, actor: &Actor, id: AccountId, banned: bool) -> Result<()> {
        let mut state = self.state();
        AccountService::set_banned(&mut state, actor, id, banned)?;
        self.persist_accounts(&state);
        Ok(())
    }

    pub fn deposit(
        &self,
        actor: &Actor,
        to: AccountId,
        amount: Money,
        note: Option<String>,
    ) -> Result<Uuid> {
        let mut state = self.state();
        let checkpoint = state.clone();
        let appended_from = state.entries.len();
        let entry = match AccountService::deposit(&mut state, actor, to, amount, note) {
            Ok(entry) => entry,
            Err(err) => {
                *state = checkpoint;
                return Err(err);
            }
        };
        self.flush_entries(&mut state, &checkpoint, appended_from)?;
        self.persist_accounts(&state);
        Ok(entry)
    }

    // ----- transfers -----

    pub fn transfer(
        &self,
        actor: &Actor,
        from: AccountId,
        to: AccountId,
        amount: Money,
    ) -> Result<TransferOutcome> {
        let mut state = self.state();
        let checkpoint = state.clone();
        let appended_from = state.entries.len();
        let outcome = match TransferService::send(&mut state, actor, from, to, amount) {
            Ok(outcome) => outcome,
            Err(err) => {
                *state = checkpoint;
                return Err(err);
            }
        };
        self.flush_entries(&mut state, &checkpoint, appended_from)?;
        self.persist_accounts(&state);
        self.persist_pending(&state);
        self.persist_announcements(&state);
        Ok(outcome)
    }

    pub fn resolve_pending(
        &self,
        actor: &Actor,
        request: Uuid,
        approve: bool,
    ) -> Result<Resolution> {
        let mut state = self.state();
        let checkpoint = state.clone();
        let appended_from = state.entries.len();
        let resolution = match TransferService::resolve(&mut state, actor, request, approve) {
            Ok(resolution) => resolution,
            Err(err) => {
                *state = checkpoint;
                return Err(err);
            }
        };
        self.flush_entries(&mut state, &checkpoint, appended_from)?;
        self.persist_accounts(&state);
        self.persist_pending(&state);
        self.persist_announcements(&state);
        Ok(resolution)
    }

    pub fn pending_transfers(&self) -> Vec<PendingTransfer> {
        self.state().pending.clone()
    }

    // ----- ledger -----

    /// Matching ledger entries, most recent first.
    pub fn entries(&self, filter: &LedgerFilter) -> Vec<TransactionEntry> {
        self.state().query(filter)
    }

    // ----- jobs -----

    /// Runs the tax/bonus/lottery job. Returns `Ok(None)` when a run is
    /// already in progress: overlapping triggers are a no-op.
    pub fn run_jobs(&self) -> Result<Option<JobReport>> {
        let _gate = match self.job_gate.try_lock() {
            Ok(gate) => gate,
            Err(TryLockError::WouldBlock) => {
                debug!("job run already in progress; trigger ignored");
                return Ok(None);
            }
            Err(TryLockError::Poisoned(err)) => err.into_inner(),
        };
        let mut picker = self.picker.lock().expect("winner picker mutex poisoned");
        let mut state = self.state();
        let checkpoint = state.clone();
        let appended_from = state.entries.len();
        let report = match JobService::run(&mut state, picker.as_mut()) {
            Ok(report) => report,
            Err(err) => {
                *state = checkpoint;
                return Err(err);
            }
        };
        self.flush_entries(&mut state, &checkpoint, appended_from)?;
        self.persist_accounts(&state);
        self.persist_announcements(&state);
        Ok(Some(report))
    }

    pub fn job_config(&self) -> JobConfig {
        self.state().config.clone()
    }

    /// Replaces the job configuration. A changed interval re-arms the
    /// pending timer without running the job early.
    pub fn set_job_config(&self, actor: &Actor, config: JobConfig) -> Result<()> {
        if !actor.privileged {
            return Err(BankError::Forbidden);
        }
        config.validate()?;
        let interval_changed;
        {
            let mut state = self.state();
            interval_changed = state.config.interval_ms != config.interval_ms;
            state.config = config.clone();
            state.touch();
            if let Err(err) = self.store.save_job_config(&config) {
                warn!(error = %err, "job config save failed");
            }
        }
        if interval_changed {
            if let Some(handle) = self.scheduler.get() {
                handle.reschedule(config.interval());
                info!(interval_ms = config.interval_ms, "job timer rescheduled");
            }
        }
        Ok(())
    }

    // ----- notices and announcements -----

    pub fn send_notice(&self, actor: &Actor, target: NoticeTarget, text: &str) -> Result<Uuid> {
        let mut state = self.state();
        let id = NoticeService::send(&mut state, actor, target, text)?;
        self.persist_notices(&state);
        Ok(id)
    }

    pub fn mark_notice_read(&self, account: AccountId, notice: Uuid) {
        let mut state = self.state();
        NoticeService::mark_read(&mut state, account, notice);
        self.persist_notices(&state);
    }

    pub fn notices_for(&self, account: AccountId) -> Vec<NoticeView> {
        let state = self.state();
        NoticeService::visible_to(&state, account)
    }

    /// Removes and returns the oldest queued announcement.
    pub fn pop_announcement(&self) -> Option<Announcement> {
        let mut state = self.state();
        let popped = state.pop_announcement();
        if popped.is_some() {
            self.persist_announcements(&state);
        }
        popped
    }

    pub fn announcements(&self) -> Vec<Announcement> {
        self.state().announcements.iter().cloned().collect()
    }

    pub fn clear_announcements(&self, actor: &Actor) -> Result<usize> {
        if !actor.privileged {
            return Err(BankError::Forbidden);
        }
        let mut state = self.state();
        let drained = state.announcements.len();
        state.announcements.clear();
        state.touch();
        self.persist_announcements(&state);
        info!(drained, "announcement queue cleared");
        Ok(drained)
    }

    // ----- persistence -----

    /// Appends freshly created entries to the durable ledger. The ledger and
    /// the balance change commit as one unit: a failed append restores the
    /// checkpoint and fails the whole operation.
    fn flush_entries(
        &self,
        state: &mut BankState,
        checkpoint: &BankState,
        appended_from: usize,
    ) -> Result<()> {
        let fresh: Vec<TransactionEntry> =
            state.entries.iter().skip(appended_from).cloned().collect();
        for entry in &fresh {
            if let Err(err) = self.store.append_ledger_entry(entry) {
                warn!(error = %err, entry = %entry.id, "ledger append failed; rolling back");
                *state = checkpoint.clone();
                return Err(err);
            }
        }
        Ok(())
    }

    fn persist_accounts(&self, state: &BankState) {
        if let Err(err) = self.store.save_accounts(&state.accounts) {
            warn!(error = %err, "account snapshot save failed");
        }
    }

    fn persist_pending(&self, state: &BankState) {
        if let Err(err) = self.store.save_pending(&state.pending) {
            warn!(error = %err, "pending transfer save failed");
        }
    }

    fn persist_notices(&self, state: &BankState) {
        if let Err(err) = self.store.save_notices(&state.board) {
            warn!(error = %err, "notice board save failed");
        }
    }

    fn persist_announcements(&self, state: &BankState) {
        if let Err(err) = self.store.save_announcements(&state.announcements) {
            warn!(error = %err, "announcement queue save failed");
        }
    }
}
