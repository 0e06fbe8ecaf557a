//! Notices and the broadcast announcement queue.

use tracing::info;
use uuid::Uuid;

use crate::core::actor::Actor;
use crate::errors::{BankError, Result};
use crate::ledger::{AccountId, BankState, NoticeTarget, NoticeView};

pub struct NoticeService;

impl NoticeService {
    /// Posts a notice from a privileged author. The target account is not
    /// required to exist; delivery is a presentation concern.
    pub fn send(
        state: &mut BankState,
        actor: &Actor,
        target: NoticeTarget,
        text: &str,
    ) -> Result<Uuid> {
        if !actor.privileged {
            return Err(BankError::Forbidden);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(BankError::InvalidInput(
                "notice text must not be empty".into(),
            ));
        }
        let id = state.board.post(actor.account_id, target, text);
        state.touch();
        info!(notice = %id, %target, "notice posted");
        Ok(id)
    }

    /// Marks a notice read for one account; re-marking is a no-op.
    pub fn mark_read(state: &mut BankState, account: AccountId, notice: Uuid) {
        if state.board.mark_read(account, notice) {
            state.touch();
        }
    }

    pub fn visible_to(state: &BankState, account: AccountId) -> Vec<NoticeView> {
        state.board.visible_to(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::account_service::AccountService;
    use crate::ledger::Role;

    #[test]
    fn posting_requires_privilege_and_text() {
        let mut state = BankState::new();
        let admin = AccountService::register(&mut state, "Admin", Role::Privileged).unwrap();
        let kid = AccountService::register(&mut state, "Kid", Role::Standard).unwrap();

        assert!(matches!(
            NoticeService::send(&mut state, &Actor::new(kid, false), NoticeTarget::All, "hi"),
            Err(BankError::Forbidden)
        ));
        assert!(matches!(
            NoticeService::send(&mut state, &Actor::new(admin, true), NoticeTarget::All, "  "),
            Err(BankError::InvalidInput(_))
        ));

        let id = NoticeService::send(
            &mut state,
            &Actor::new(admin, true),
            NoticeTarget::Account(kid),
            "Allowance day!",
        )
        .unwrap();

        let views = NoticeService::visible_to(&state, kid);
        assert_eq!(views.len(), 1);
        assert!(!views[0].read);

        NoticeService::mark_read(&mut state, kid, id);
        NoticeService::mark_read(&mut state, kid, id);
        assert!(NoticeService::visible_to(&state, kid)[0].read);
    }
}
