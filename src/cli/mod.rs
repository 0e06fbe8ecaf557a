//! Argument-driven presentation shell over the bank core.
//!
//! Rendering and actor resolution live here; every rule is enforced by the
//! core. Accounts are addressed by display name for convenience.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;

use crate::core::{Actor, Bank};
use crate::errors::{BankError, Result};
use crate::ledger::{Account, LedgerFilter, NoticeTarget, Role};
use crate::money::Money;
use crate::storage::JsonStore;

pub fn run_cli() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let data_dir = take_flag(&mut args, "--data-dir")?.map(PathBuf::from);
    let actor_name = take_flag(&mut args, "--as")?;

    let store = JsonStore::new(data_dir)?;
    let bank = Arc::new(Bank::open(Box::new(store))?);

    let command = args.first().cloned().unwrap_or_else(|| "help".to_string());
    match command.as_str() {
        "seed" => seed(&bank),
        "accounts" => {
            list_accounts(&bank);
            Ok(())
        }
        "transfer" => {
            let (from, to, amount) = transfer_args(&args)?;
            let from = find_account(&bank, &from)?;
            let to = find_account(&bank, &to)?;
            let actor = resolve_actor(&bank, actor_name.as_deref(), Some(&from))?;
            let outcome = bank.transfer(&actor, from.id, to.id, amount)?;
            println!("{outcome:?}");
            Ok(())
        }
        "deposit" => {
            let (to, amount) = deposit_args(&args)?;
            let to = find_account(&bank, &to)?;
            let actor = resolve_actor(&bank, actor_name.as_deref(), None)?;
            bank.deposit(&actor, to.id, amount, Some("deposited via CLI".into()))?;
            println!("Deposited {} to {}.", amount, to.display_name.bold());
            Ok(())
        }
        "jobs" => {
            match bank.run_jobs()? {
                Some(report) => println!(
                    "Job run complete: {} accounts processed, winner: {:?}",
                    report.processed, report.winner
                ),
                None => println!("A job run is already in progress."),
            }
            Ok(())
        }
        "serve" => {
            let seconds: u64 = args
                .get(1)
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(60);
            Bank::start_scheduler(&bank)?;
            println!("Job timer armed; serving for {seconds}s (ctrl-c to stop sooner).");
            std::thread::sleep(std::time::Duration::from_secs(seconds));
            bank.shutdown();
            Ok(())
        }
        "ledger" => {
            for entry in bank.entries(&LedgerFilter::any()) {
                let note = entry.note.as_deref().unwrap_or("");
                println!(
                    "{}  {:<16} {} -> {}  {}  {}",
                    entry.ts.format("%Y-%m-%d %H:%M:%S"),
                    entry.kind.to_string(),
                    entry.from,
                    entry.to,
                    entry.amount.to_string().green(),
                    note.dimmed()
                );
            }
            Ok(())
        }
        "pending" => {
            for transfer in bank.pending_transfers() {
                println!(
                    "{}  {} -> {}  {}  {}",
                    transfer.id, transfer.from, transfer.to, transfer.amount, transfer.status
                );
            }
            Ok(())
        }
        "approve" | "reject" => {
            let id = args
                .get(1)
                .ok_or_else(|| BankError::InvalidInput("expected a pending transfer id".into()))?
                .parse()
                .map_err(|_| BankError::InvalidInput("malformed pending transfer id".into()))?;
            let actor = resolve_actor(&bank, actor_name.as_deref(), None)?;
            let resolution = bank.resolve_pending(&actor, id, command == "approve")?;
            println!("{resolution:?}");
            Ok(())
        }
        "announcements" => {
            while let Some(announcement) = bank.pop_announcement() {
                println!("{}", announcement.message.yellow().bold());
            }
            Ok(())
        }
        _ => {
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("BancoKids demo CLI");
    println!();
    println!("Usage: bancokids_core_cli [--data-dir DIR] [--as NAME] <command>");
    println!();
    println!("Commands:");
    println!("  seed                         create the demo accounts");
    println!("  accounts                     list accounts and balances");
    println!("  transfer FROM TO AMOUNT      send money between accounts");
    println!("  deposit TO AMOUNT            privileged deposit");
    println!("  jobs                         run tax/bonus/lottery now");
    println!("  serve [SECONDS]              arm the job timer for a while");
    println!("  ledger                       show the transaction log");
    println!("  pending                      list pending transfers");
    println!("  approve ID | reject ID       resolve a pending transfer");
    println!("  announcements                drain the announcement queue");
}

fn seed(bank: &Arc<Bank>) -> Result<()> {
    if !bank.accounts().is_empty() {
        return Err(BankError::InvalidInput(
            "this data directory is already seeded".into(),
        ));
    }
    let manel = bank.register_account("Manel", Role::Privileged)?;
    let alice = bank.register_account("Alice", Role::Standard)?;
    let joao = bank.register_account("João", Role::Standard)?;
    let caeiro = bank.register_account("Caeiro", Role::Privileged)?;

    let root = Actor::new(manel, true);
    let note = || Some("seeded opening balance".to_string());
    bank.deposit(&root, manel, Money::from_units(1000), note())?;
    bank.deposit(&root, alice, Money::from_units(50), note())?;
    bank.deposit(&root, joao, Money::from_units(30), note())?;
    bank.deposit(&root, caeiro, Money::from_units(500), note())?;

    let _ = bank.send_notice(&root, NoticeTarget::All, "Welcome to BancoKids!")?;
    list_accounts(bank);
    Ok(())
}

fn list_accounts(bank: &Arc<Bank>) {
    for account in bank.accounts() {
        let flag = if account.banned {
            " BANNED".red().to_string()
        } else {
            String::new()
        };
        println!(
            "{:<12} {:<12} {}{}",
            account.display_name.bold(),
            account.role.to_string(),
            account.balance.to_string().green(),
            flag
        );
    }
}

fn find_account(bank: &Arc<Bank>, name: &str) -> Result<Account> {
    bank.accounts()
        .into_iter()
        .find(|account| account.display_name.eq_ignore_ascii_case(name))
        .ok_or_else(|| BankError::InvalidInput(format!("no account named `{name}`")))
}

/// The acting identity: `--as NAME` if given, otherwise the implied account
/// (e.g. the transfer sender). Privilege comes from the stored role.
fn resolve_actor(
    bank: &Arc<Bank>,
    actor_name: Option<&str>,
    implied: Option<&Account>,
) -> Result<Actor> {
    match actor_name {
        Some(name) => Ok(Actor::for_account(&find_account(bank, name)?)),
        None => match implied {
            Some(account) => Ok(Actor::for_account(account)),
            None => Err(BankError::InvalidInput(
                "this command needs --as NAME".into(),
            )),
        },
    }
}

fn transfer_args(args: &[String]) -> Result<(String, String, Money)> {
    match args {
        [_, from, to, amount] => Ok((from.clone(), to.clone(), Money::parse(amount)?)),
        _ => Err(BankError::InvalidInput(
            "usage: transfer FROM TO AMOUNT".into(),
        )),
    }
}

fn deposit_args(args: &[String]) -> Result<(String, Money)> {
    match args {
        [_, to, amount] => Ok((to.clone(), Money::parse(amount)?)),
        _ => Err(BankError::InvalidInput("usage: deposit TO AMOUNT".into())),
    }
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> Result<Option<String>> {
    if let Some(index) = args.iter().position(|arg| arg == flag) {
        if index + 1 >= args.len() {
            return Err(BankError::InvalidInput(format!("{flag} needs a value")));
        }
        let value = args.remove(index + 1);
        args.remove(index);
        return Ok(Some(value));
    }
    Ok(None)
}
