//! Timer thread driving the recurring job.
//!
//! The loop re-arms after every completed run using the interval current at
//! that moment. A reschedule replaces the pending timer without running the
//! job early; a run already in progress is never interrupted.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, Weak};
use std::thread;
use std::time::Duration;

use tracing::{error, info};

use crate::core::bank::Bank;

enum SchedulerCommand {
    Reschedule(Duration),
    Shutdown,
}

/// Handle to control the running timer thread.
pub struct SchedulerHandle {
    tx: mpsc::Sender<SchedulerCommand>,
    join: Mutex<Option<thread::JoinHandle<()>>>,
}

impl SchedulerHandle {
    /// Cancels the pending timer and re-arms it with the new interval.
    pub fn reschedule(&self, interval: Duration) {
        let _ = self.tx.send(SchedulerCommand::Reschedule(interval));
    }

    /// Requests the timer thread to stop and waits for it to finish.
    pub fn shutdown(&self) {
        let _ = self.tx.send(SchedulerCommand::Shutdown);
        let join = self
            .join
            .lock()
            .expect("scheduler join handle poisoned")
            .take();
        if let Some(join) = join {
            let _ = join.join();
        }
    }
}

/// Spawns the timer thread. The job runs once immediately, then on every
/// interval. The thread holds only a weak reference, so it winds down on
/// its own once the bank is dropped.
pub fn spawn(bank: &Arc<Bank>) -> SchedulerHandle {
    let (tx, rx) = mpsc::channel();
    let mut interval = bank.job_config().interval();
    let weak = Arc::downgrade(bank);
    let join = thread::Builder::new()
        .name("bancokids-jobs".to_string())
        .spawn(move || {
            info!(interval_ms = interval.as_millis() as u64, "job scheduler started");
            run_once(&weak);
            loop {
                match rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if !run_once(&weak) {
                            break;
                        }
                    }
                    Ok(SchedulerCommand::Reschedule(next)) => {
                        interval = next;
                        info!(
                            interval_ms = interval.as_millis() as u64,
                            "job timer re-armed"
                        );
                    }
                    Ok(SchedulerCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            info!("job scheduler stopped");
        })
        .expect("failed to spawn job scheduler thread");
    SchedulerHandle {
        tx,
        join: Mutex::new(Some(join)),
    }
}

fn run_once(bank: &Weak<Bank>) -> bool {
    let Some(bank) = bank.upgrade() else {
        return false;
    };
    if let Err(err) = bank.run_jobs() {
        error!(error = %err, "scheduled job run failed");
    }
    true
}
