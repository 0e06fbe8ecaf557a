//! Transfer decisioning, execution, and pending-approval resolution.

use tracing::info;
use uuid::Uuid;

use super::account_service::AccountService;
use crate::core::actor::Actor;
use crate::errors::{BankError, Result};
use crate::ledger::{AccountId, BankState, EntryKind, Party, PendingStatus, PendingTransfer};
use crate::money::Money;

/// How a transfer request left the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Debit and credit were applied and logged.
    Executed { entry: Uuid },
    /// The request now awaits a privileged decision; balances are untouched.
    PendingApproval { request: Uuid },
}

/// Terminal result of resolving a pending transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Approved { entry: Uuid },
    Rejected,
}

/// Drives the transfer state machine over the bank state.
pub struct TransferService;

impl TransferService {
    /// Files a transfer request. Amounts above the approval limit from a
    /// non-privileged actor are parked for approval; everything else
    /// executes immediately.
    pub fn send(
        state: &mut BankState,
        actor: &Actor,
        from: AccountId,
        to: AccountId,
        amount: Money,
    ) -> Result<TransferOutcome> {
        let sender = state.account(from).ok_or(BankError::AccountNotFound(from))?;
        let recipient = state.account(to).ok_or(BankError::AccountNotFound(to))?;
        if sender.banned {
            return Err(BankError::BannedAccount(from));
        }
        if recipient.banned {
            return Err(BankError::BannedAccount(to));
        }
        if !amount.is_positive() {
            return Err(BankError::InvalidAmount(amount.to_string()));
        }

        if amount > state.config.approval_limit && !actor.privileged {
            let request = state.add_pending(PendingTransfer::new(from, to, amount));
            info!(%request, %from, %to, %amount, "transfer parked for approval");
            return Ok(TransferOutcome::PendingApproval { request });
        }

        let entry = Self::execute(state, from, to, amount)?;
        info!(%from, %to, %amount, "transfer executed");
        Ok(TransferOutcome::Executed { entry })
    }

    /// Approves or rejects a pending transfer. Each request resolves at
    /// most once; a failed approval (e.g. the sender no longer covers the
    /// amount) leaves it open for another attempt.
    pub fn resolve(
        state: &mut BankState,
        actor: &Actor,
        request: Uuid,
        approve: bool,
    ) -> Result<Resolution> {
        if !actor.privileged {
            return Err(BankError::Forbidden);
        }
        let pending = state
            .pending(request)
            .ok_or(BankError::PendingNotFound(request))?;
        if !pending.is_open() {
            return Err(BankError::AlreadyResolved(request));
        }
        let (from, to, amount) = (pending.from, pending.to, pending.amount);

        if !approve {
            if let Some(pending) = state.pending_mut(request) {
                pending.status = PendingStatus::Rejected;
            }
            state.touch();
            info!(%request, "pending transfer rejected");
            return Ok(Resolution::Rejected);
        }

        // Balances may have drifted since the request was filed.
        let entry = Self::execute(state, from, to, amount)?;
        if let Some(pending) = state.pending_mut(request) {
            pending.status = PendingStatus::Approved;
        }
        state.touch();
        info!(%request, %from, %to, %amount, "pending transfer approved");
        Ok(Resolution::Approved { entry })
    }

    /// Atomic debit + credit + ledger entry, plus the celebratory
    /// broadcast for any executed transfer above the approval limit.
    fn execute(
        state: &mut BankState,
        from: AccountId,
        to: AccountId,
        amount: Money,
    ) -> Result<Uuid> {
        if state.account(to).is_none() {
            return Err(BankError::AccountNotFound(to));
        }
        AccountService::apply_delta(state, from, -amount.cents())?;
        AccountService::apply_delta(state, to, amount.cents())?;
        let entry = state.append_entry(
            EntryKind::Transfer,
            Party::Account(from),
            Party::Account(to),
            amount,
            None,
        );
        if amount > state.config.approval_limit {
            let sender = display_name(state, from);
            let recipient = display_name(state, to);
            state.enqueue_announcement(format!(
                "WOW! {sender} transferred {amount} to {recipient}. Enjoy it!"
            ));
        }
        Ok(entry)
    }
}

fn display_name(state: &BankState, id: AccountId) -> String {
    state
        .account(id)
        .map(|account| account.display_name.clone())
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Role;

    fn populated_state() -> (BankState, Actor, AccountId, AccountId) {
        let mut state = BankState::new();
        let admin = AccountService::register(&mut state, "Manel", Role::Privileged).unwrap();
        let admin_actor = Actor::new(admin, true);
        let alice = AccountService::register(&mut state, "Alice", Role::Standard).unwrap();
        let bob = AccountService::register(&mut state, "Bob", Role::Standard).unwrap();
        AccountService::deposit(&mut state, &admin_actor, alice, Money::from_units(50), None)
            .unwrap();
        (state, admin_actor, alice, bob)
    }

    #[test]
    fn small_transfers_execute_directly() {
        let (mut state, _, alice, bob) = populated_state();
        let actor = Actor::new(alice, false);
        let outcome =
            TransferService::send(&mut state, &actor, alice, bob, Money::from_units(30)).unwrap();
        assert!(matches!(outcome, TransferOutcome::Executed { .. }));
        assert_eq!(state.account(alice).unwrap().balance, Money::from_units(20));
        assert_eq!(state.account(bob).unwrap().balance, Money::from_units(30));
        assert!(state.announcements.is_empty());
    }

    #[test]
    fn over_limit_transfers_wait_for_approval() {
        let (mut state, _, alice, bob) = populated_state();
        let actor = Actor::new(alice, false);
        let outcome =
            TransferService::send(&mut state, &actor, alice, bob, Money::from_units(150)).unwrap();
        let request = match outcome {
            TransferOutcome::PendingApproval { request } => request,
            other => panic!("expected pending approval, got {other:?}"),
        };
        assert_eq!(state.account(alice).unwrap().balance, Money::from_units(50));
        assert_eq!(state.account(bob).unwrap().balance, Money::ZERO);
        assert!(state.pending(request).unwrap().is_open());
        assert!(state.entries.iter().all(|e| e.kind != EntryKind::Transfer));
    }

    #[test]
    fn privileged_bypass_executes_and_still_announces() {
        let (mut state, admin_actor, alice, bob) = populated_state();
        AccountService::deposit(&mut state, &admin_actor, alice, Money::from_units(200), None)
            .unwrap();
        let outcome =
            TransferService::send(&mut state, &admin_actor, alice, bob, Money::from_units(150))
                .unwrap();
        assert!(matches!(outcome, TransferOutcome::Executed { .. }));
        assert_eq!(state.announcements.len(), 1);
        assert!(state.announcements[0].message.contains("Alice"));
    }

    #[test]
    fn resolution_happens_exactly_once() {
        let (mut state, admin_actor, alice, bob) = populated_state();
        let actor = Actor::new(alice, false);
        let outcome =
            TransferService::send(&mut state, &actor, alice, bob, Money::from_units(150)).unwrap();
        let request = match outcome {
            TransferOutcome::PendingApproval { request } => request,
            other => panic!("unexpected outcome {other:?}"),
        };

        assert!(matches!(
            TransferService::resolve(&mut state, &actor, request, true),
            Err(BankError::Forbidden)
        ));

        // sender cannot cover the amount yet; the request stays open
        let err = TransferService::resolve(&mut state, &admin_actor, request, true).unwrap_err();
        assert!(matches!(err, BankError::InsufficientFunds { .. }));
        assert!(state.pending(request).unwrap().is_open());

        AccountService::deposit(&mut state, &admin_actor, alice, Money::from_units(170), None)
            .unwrap();
        let resolution =
            TransferService::resolve(&mut state, &admin_actor, request, true).unwrap();
        assert!(matches!(resolution, Resolution::Approved { .. }));
        assert_eq!(state.account(alice).unwrap().balance, Money::from_units(70));
        assert_eq!(state.account(bob).unwrap().balance, Money::from_units(150));

        assert!(matches!(
            TransferService::resolve(&mut state, &admin_actor, request, true),
            Err(BankError::AlreadyResolved(_))
        ));
        assert_eq!(state.account(bob).unwrap().balance, Money::from_units(150));
    }

    #[test]
    fn rejection_leaves_balances_untouched() {
        let (mut state, admin_actor, alice, bob) = populated_state();
        let actor = Actor::new(alice, false);
        let outcome =
            TransferService::send(&mut state, &actor, alice, bob, Money::from_units(120)).unwrap();
        let request = match outcome {
            TransferOutcome::PendingApproval { request } => request,
            other => panic!("unexpected outcome {other:?}"),
        };
        let resolution =
            TransferService::resolve(&mut state, &admin_actor, request, false).unwrap();
        assert_eq!(resolution, Resolution::Rejected);
        assert_eq!(state.account(alice).unwrap().balance, Money::from_units(50));
        assert_eq!(
            state.pending(request).unwrap().status,
            PendingStatus::Rejected
        );
        assert!(state.announcements.is_empty());
    }

    #[test]
    fn entry_checks_run_before_any_state_change() {
        let (mut state, admin_actor, alice, bob) = populated_state();
        let actor = Actor::new(alice, false);

        let ghost = AccountId::new();
        assert!(matches!(
            TransferService::send(&mut state, &actor, alice, ghost, Money::from_units(5)),
            Err(BankError::AccountNotFound(_))
        ));
        assert!(matches!(
            TransferService::send(&mut state, &actor, alice, bob, Money::ZERO),
            Err(BankError::InvalidAmount(_))
        ));

        AccountService::set_banned(&mut state, &admin_actor, bob, true).unwrap();
        assert!(matches!(
            TransferService::send(&mut state, &actor, alice, bob, Money::from_units(5)),
            Err(BankError::BannedAccount(_))
        ));

        assert_eq!(state.account(alice).unwrap().balance, Money::from_units(50));
        assert!(state.pending.is_empty());
        assert_eq!(
            state
                .entries
                .iter()
                .filter(|e| e.kind == EntryKind::Transfer)
                .count(),
            0
        );
    }
}
