use predicates::prelude::*;
use test_support::{cmd_bin, tempdir, FakeBackend, BIN};

#[test]
fn unlisted_user_is_denied_before_validation() {
  let td = tempdir();
  let backend = FakeBackend::recording(td.path(), "exit 0");
  let out = cmd_bin(BIN)
    .args(backend.args())
    .args(["--kind", "monthly", "--term", "not-a-term"])
    .args(["--allow-user", "librarian", "--user", "guest"])
    .output()
    .unwrap();

  assert_eq!(out.status.code(), Some(3));
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["status"], "denied");
  assert_eq!(v["user"], "guest");
  assert_eq!(FakeBackend::recorded_args(td.path()), "");
}

#[test]
fn listed_user_is_served() {
  let td = tempdir();
  let backend = FakeBackend::write(td.path(), "printf 'pdf'");
  cmd_bin(BIN)
    .args(backend.args())
    .args(["--kind", "timezone", "--term", "202304"])
    .args(["--allow-user", "librarian", "--user", "librarian"])
    .args(["--out", td.path().join("out").to_str().unwrap()])
    .assert()
    .success()
    .stdout(predicate::str::contains("202304_timezone_daily_report.pdf"));
}

#[test]
fn allow_list_without_user_denies() {
  let td = tempdir();
  let backend = FakeBackend::write(td.path(), "exit 0");
  cmd_bin(BIN)
    .args(backend.args())
    .args(["--kind", "groups", "--term", "2023", "--allow-user", "librarian"])
    .assert()
    .code(3);
}

#[test]
fn unknown_flag_is_a_usage_error() {
  cmd_bin(BIN)
    .args(["--kind", "monthly", "--bogus"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("--bogus"));
}
