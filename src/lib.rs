#![doc(test(attr(deny(warnings))))]

//! BancoKids Core provides the ledger, transfer-approval, and recurring-job
//! primitives behind a supervised kids bank.

pub mod cli;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod money;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("BancoKids Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
