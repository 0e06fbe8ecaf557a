//! Validated mutations for account records.

use tracing::info;
use uuid::Uuid;

use crate::core::actor::Actor;
use crate::errors::{BankError, Result};
use crate::ledger::{Account, AccountId, BankState, EntryKind, Party, Role};
use crate::money::Money;

/// Provides validated mutations for [`Account`] entities.
pub struct AccountService;

impl AccountService {
    /// Registers a new zero-balance account. Signup itself (credentials,
    /// sessions) lives outside the core.
    pub fn register(state: &mut BankState, display_name: &str, role: Role) -> Result<AccountId> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(BankError::InvalidInput(
                "display name must not be empty".into(),
            ));
        }
        let id = state.add_account(Account::new(name, role));
        info!(account = %id, name, %role, "account registered");
        Ok(id)
    }

    /// Applies a signed balance change in cents. Debits are refused for
    /// banned accounts and whenever they would overdraw the balance.
    pub fn apply_delta(state: &mut BankState, id: AccountId, delta_cents: i64) -> Result<Money> {
        let account = state
            .account_mut(id)
            .ok_or(BankError::AccountNotFound(id))?;
        if delta_cents < 0 && account.banned {
            return Err(BankError::BannedAccount(id));
        }
        let next = account.balance.cents() + delta_cents;
        if next < 0 {
            return Err(BankError::InsufficientFunds {
                account: id,
                balance: account.balance,
                required: Money::from_cents(-delta_cents),
            });
        }
        account.balance = Money::from_cents(next);
        let updated = account.balance;
        state.touch();
        Ok(updated)
    }

    /// Sets or clears the ban flag. The designated root account is refused.
    pub fn set_banned(
        state: &mut BankState,
        actor: &Actor,
        id: AccountId,
        banned: bool,
    ) -> Result<()> {
        if !actor.privileged {
            return Err(BankError::Forbidden);
        }
        if banned && state.root_account() == Some(id) {
            return Err(BankError::ProtectedAccount);
        }
        let account = state
            .account_mut(id)
            .ok_or(BankError::AccountNotFound(id))?;
        account.banned = banned;
        state.touch();
        info!(account = %id, banned, "ban flag updated");
        Ok(())
    }

    /// Credits an arbitrary account on behalf of a privileged actor and
    /// records an admin-adjustment ledger entry.
    pub fn deposit(
        state: &mut BankState,
        actor: &Actor,
        to: AccountId,
        amount: Money,
        note: Option<String>,
    ) -> Result<Uuid> {
        if !actor.privileged {
            return Err(BankError::Forbidden);
        }
        if !amount.is_positive() {
            return Err(BankError::InvalidAmount(amount.to_string()));
        }
        let target = state.account(to).ok_or(BankError::AccountNotFound(to))?;
        if target.banned {
            return Err(BankError::BannedAccount(to));
        }
        Self::apply_delta(state, to, amount.cents())?;
        let entry = state.append_entry(
            EntryKind::AdminAdjustment,
            Party::Account(actor.account_id),
            Party::Account(to),
            amount,
            note,
        );
        info!(account = %to, %amount, "administrative deposit");
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_admin() -> (BankState, Actor) {
        let mut state = BankState::new();
        let admin = AccountService::register(&mut state, "Manel", Role::Privileged).unwrap();
        let actor = Actor::new(admin, true);
        (state, actor)
    }

    #[test]
    fn delta_rejects_overdraw_and_unknown_accounts() {
        let (mut state, _) = state_with_admin();
        let kid = AccountService::register(&mut state, "Alice", Role::Standard).unwrap();
        AccountService::apply_delta(&mut state, kid, 5_00).unwrap();

        let err = AccountService::apply_delta(&mut state, kid, -10_00).unwrap_err();
        assert!(matches!(err, BankError::InsufficientFunds { .. }));
        assert_eq!(state.account(kid).unwrap().balance, Money::from_cents(5_00));

        let missing = AccountId::new();
        assert!(matches!(
            AccountService::apply_delta(&mut state, missing, 1),
            Err(BankError::AccountNotFound(_))
        ));
    }

    #[test]
    fn banned_accounts_refuse_debits_but_accept_credits() {
        let (mut state, actor) = state_with_admin();
        let kid = AccountService::register(&mut state, "Joao", Role::Standard).unwrap();
        AccountService::apply_delta(&mut state, kid, 20_00).unwrap();
        AccountService::set_banned(&mut state, &actor, kid, true).unwrap();

        assert!(matches!(
            AccountService::apply_delta(&mut state, kid, -1_00),
            Err(BankError::BannedAccount(_))
        ));
        AccountService::apply_delta(&mut state, kid, 1_00).unwrap();
    }

    #[test]
    fn root_account_cannot_be_banned() {
        let (mut state, actor) = state_with_admin();
        let root = state.root_account().unwrap();
        assert!(matches!(
            AccountService::set_banned(&mut state, &actor, root, true),
            Err(BankError::ProtectedAccount)
        ));

        // a later privileged account is not protected
        let second = AccountService::register(&mut state, "Caeiro", Role::Privileged).unwrap();
        AccountService::set_banned(&mut state, &actor, second, true).unwrap();
        assert!(state.account(second).unwrap().banned);
    }

    #[test]
    fn deposit_requires_privilege_and_live_target() {
        let (mut state, actor) = state_with_admin();
        let kid = AccountService::register(&mut state, "Alice", Role::Standard).unwrap();

        let standard = Actor::new(kid, false);
        assert!(matches!(
            AccountService::deposit(&mut state, &standard, kid, Money::from_units(5), None),
            Err(BankError::Forbidden)
        ));

        AccountService::set_banned(&mut state, &actor, kid, true).unwrap();
        assert!(matches!(
            AccountService::deposit(&mut state, &actor, kid, Money::from_units(5), None),
            Err(BankError::BannedAccount(_))
        ));

        AccountService::set_banned(&mut state, &actor, kid, false).unwrap();
        AccountService::deposit(&mut state, &actor, kid, Money::from_units(5), None).unwrap();
        assert_eq!(state.account(kid).unwrap().balance, Money::from_units(5));
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].kind, EntryKind::AdminAdjustment);
    }
}
