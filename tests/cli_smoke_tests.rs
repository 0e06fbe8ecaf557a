use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli() -> Command {
    Command::cargo_bin("bancokids_core_cli").expect("binary builds")
}

#[test]
fn help_lists_the_commands() {
    cli()
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("transfer FROM TO AMOUNT"));
}

#[test]
fn seed_then_list_then_transfer() {
    let temp = TempDir::new().expect("temp dir");
    let dir = temp.path().to_str().expect("utf8 path");

    cli()
        .args(["--data-dir", dir, "seed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice"));

    cli()
        .args(["--data-dir", dir, "transfer", "Alice", "Caeiro", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Executed"));

    cli()
        .args(["--data-dir", dir, "accounts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("€40.00"));

    cli()
        .args(["--data-dir", dir, "ledger"])
        .assert()
        .success()
        .stdout(predicate::str::contains("transfer"));
}

#[test]
fn seeding_twice_fails_cleanly() {
    let temp = TempDir::new().expect("temp dir");
    let dir = temp.path().to_str().expect("utf8 path");

    cli().args(["--data-dir", dir, "seed"]).assert().success();
    cli()
        .args(["--data-dir", dir, "seed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already seeded"));
}
