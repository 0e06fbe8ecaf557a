//! Recurring tax, bonus, and lottery application.

use tracing::info;

use crate::core::picker::WinnerPicker;
use crate::errors::Result;
use crate::ledger::{AccountId, BankState, EntryKind, Party};
use crate::money::Money;

/// Summary of one job run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobReport {
    /// Accounts that received the tax + bonus pass.
    pub processed: usize,
    pub winner: Option<AccountId>,
}

/// Applies the recurring tax, bonus, and lottery passes.
pub struct JobService;

impl JobService {
    pub fn run(state: &mut BankState, picker: &mut dyn WinnerPicker) -> Result<JobReport> {
        let config = state.config.clone();
        let eligible: Vec<AccountId> = state
            .accounts
            .iter()
            .filter(|account| !account.banned)
            .map(|account| account.id)
            .collect();

        // Each account is taxed and bonused independently of the others.
        for id in &eligible {
            if let Some(account) = state.account_mut(*id) {
                let taxed = account.balance.after_tax(config.tax_rate);
                account.balance = Money::from_cents(taxed.cents() + config.hourly_bonus.cents());
            }
            state.append_entry(
                EntryKind::JobTaxBonus,
                Party::System,
                Party::Account(*id),
                config.hourly_bonus,
                Some("hourly tax and bonus applied".into()),
            );
        }

        let winner = if eligible.is_empty() {
            None
        } else {
            let index = picker.pick(eligible.len()) % eligible.len();
            let id = eligible[index];
            if let Some(account) = state.account_mut(id) {
                account.balance =
                    Money::from_cents(account.balance.cents() + config.lottery_prize.cents());
            }
            state.append_entry(
                EntryKind::JobLottery,
                Party::System,
                Party::Account(id),
                config.lottery_prize,
                Some("hourly lottery prize".into()),
            );
            let name = state
                .account(id)
                .map(|account| account.display_name.clone())
                .unwrap_or_else(|| id.to_string());
            state.enqueue_announcement(format!(
                "{name} won {} in the hourly lottery!",
                config.lottery_prize
            ));
            Some(id)
        };

        info!(processed = eligible.len(), winner = ?winner, "job run completed");
        Ok(JobReport {
            processed: eligible.len(),
            winner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actor::Actor;
    use crate::core::services::account_service::AccountService;
    use crate::ledger::Role;

    struct FixedPicker(usize);

    impl WinnerPicker for FixedPicker {
        fn pick(&mut self, candidates: usize) -> usize {
            self.0 % candidates.max(1)
        }
    }

    fn state_with_balances(balances: &[i64]) -> (BankState, Actor, Vec<AccountId>) {
        let mut state = BankState::new();
        let admin = AccountService::register(&mut state, "Admin", Role::Privileged).unwrap();
        let actor = Actor::new(admin, true);
        let mut ids = vec![admin];
        for (index, units) in balances.iter().enumerate() {
            let id =
                AccountService::register(&mut state, &format!("Kid {index}"), Role::Standard)
                    .unwrap();
            if *units > 0 {
                AccountService::deposit(&mut state, &actor, id, Money::from_units(*units), None)
                    .unwrap();
            }
            ids.push(id);
        }
        (state, actor, ids)
    }

    #[test]
    fn tax_then_bonus_rounds_per_account() {
        let (mut state, _, ids) = state_with_balances(&[100]);
        let kid = ids[1];
        JobService::run(&mut state, &mut FixedPicker(0)).unwrap();
        // 100.00 * 0.98 = 98.00, + 10.00 bonus = 108.00 (admin won the prize)
        assert_eq!(state.account(kid).unwrap().balance, Money::from_units(108));
        let bonus_entries = state
            .entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::JobTaxBonus)
            .count();
        assert_eq!(bonus_entries, 2);
    }

    #[test]
    fn exactly_one_winner_per_run() {
        let (mut state, _, ids) = state_with_balances(&[10, 10]);
        let report = JobService::run(&mut state, &mut FixedPicker(1)).unwrap();
        assert_eq!(report.winner, Some(ids[1]));
        let lottery_entries: Vec<_> = state
            .entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::JobLottery)
            .collect();
        assert_eq!(lottery_entries.len(), 1);
        assert_eq!(lottery_entries[0].to, Party::Account(ids[1]));
        assert_eq!(state.announcements.len(), 1);
        assert!(state.announcements[0].message.contains("Kid 0"));
    }

    #[test]
    fn banned_accounts_are_skipped_entirely() {
        let (mut state, actor, ids) = state_with_balances(&[40, 40]);
        let banned = ids[1];
        AccountService::set_banned(&mut state, &actor, banned, true).unwrap();

        let report = JobService::run(&mut state, &mut FixedPicker(1)).unwrap();
        assert_eq!(report.processed, 2);
        assert_ne!(report.winner, Some(banned));
        assert_eq!(
            state.account(banned).unwrap().balance,
            Money::from_units(40)
        );
        assert!(state
            .entries
            .iter()
            .all(|entry| entry.to != Party::Account(banned)
                || entry.kind == EntryKind::AdminAdjustment));
    }

    #[test]
    fn empty_population_skips_the_lottery() {
        let mut state = BankState::new();
        let report = JobService::run(&mut state, &mut FixedPicker(0)).unwrap();
        assert_eq!(report.processed, 0);
        assert_eq!(report.winner, None);
        assert!(state.entries.is_empty());
        assert!(state.announcements.is_empty());
    }
}
