use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("chatroom")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("restore"))
        .stdout(predicate::str::contains("trend"))
        .stdout(predicate::str::contains("--api-url"));
}

#[test]
fn test_sessions_help_shows_subcommands() {
    cargo_bin_cmd!("chatroom")
        .args(["sessions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn test_restore_requires_entries() {
    cargo_bin_cmd!("chatroom")
        .args(["restore", "alpha"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ENTRY"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("chatroom")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("chatroom"));
}

#[test]
fn test_unreachable_backend_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("chatroom")
        .env("CHATROOM_HOME", dir.path())
        .args(["--api-url", "http://127.0.0.1:9", "sessions", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("list sessions"));
}
