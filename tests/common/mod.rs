use std::sync::Arc;

use bancokids_core::core::{Actor, Bank};
use bancokids_core::ledger::{AccountId, Role};
use bancokids_core::money::Money;
use bancokids_core::storage::MemoryStore;

pub struct SeededBank {
    pub bank: Arc<Bank>,
    pub store: Arc<MemoryStore>,
    pub admin: Actor,
    pub alice: AccountId,
    pub bob: AccountId,
}

/// Bank over an in-memory store with an admin (€1000), Alice (€50), and
/// Bob (€0).
pub fn seeded_bank() -> SeededBank {
    let store = Arc::new(MemoryStore::new());
    let bank = Arc::new(Bank::open(Box::new(Arc::clone(&store))).expect("open bank"));
    let admin_id = bank
        .register_account("Manel", Role::Privileged)
        .expect("register admin");
    let admin = Actor::new(admin_id, true);
    let alice = bank
        .register_account("Alice", Role::Standard)
        .expect("register alice");
    let bob = bank
        .register_account("Bob", Role::Standard)
        .expect("register bob");
    bank.deposit(&admin, admin_id, Money::from_units(1000), None)
        .expect("fund admin");
    bank.deposit(&admin, alice, Money::from_units(50), None)
        .expect("fund alice");
    SeededBank {
        bank,
        store,
        admin,
        alice,
        bob,
    }
}
