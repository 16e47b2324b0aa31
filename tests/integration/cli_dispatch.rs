use predicates::prelude::*;
use test_support::{cmd_bin, tempdir, FakeBackend, BIN};

const NOW: &str = "2025-08-15T12:00:00";

fn run(dir: &std::path::Path, backend: &FakeBackend, args: &[&str]) -> std::process::Output {
  let out_dir = dir.join("out");
  cmd_bin(BIN)
    .args(backend.args())
    .args(["--out", out_dir.to_str().unwrap(), "--now-override", NOW])
    .args(args)
    .output()
    .unwrap()
}

fn json(out: &std::process::Output) -> serde_json::Value {
  serde_json::from_slice(&out.stdout).unwrap_or_else(|e| {
    panic!(
      "stdout is not JSON ({e}): {}\nstderr: {}",
      String::from_utf8_lossy(&out.stdout),
      String::from_utf8_lossy(&out.stderr)
    )
  })
}

#[test]
fn padded_year_produces_monthly_pdf() {
  let td = tempdir();
  let backend = FakeBackend::recording(td.path(), r#"printf 'PDF-%s' "$1""#);
  let out = run(td.path(), &backend, &["--kind", "monthly", "--term", " 2023 "]);

  assert_eq!(out.status.code(), Some(0));
  let v = json(&out);
  assert_eq!(v["status"], "accepted");
  assert_eq!(v["filename"], "2023_monthly_report.pdf");
  assert_eq!(v["content_type"], "application/pdf");
  assert_eq!(v["query"]["start"], "2023");
  assert_eq!(v["query"]["end"], "2023");

  let written = td.path().join("out").join("2023_monthly_report.pdf");
  assert_eq!(std::fs::read_to_string(written).unwrap(), "PDF-monthly");
  assert_eq!(FakeBackend::recorded_args(td.path()), "monthly pdf 2023 2023");
}

#[test]
fn month_term_selects_the_daily_breakdown() {
  let td = tempdir();
  let backend = FakeBackend::recording(td.path(), "printf 'x'");
  let out = run(td.path(), &backend, &["--kind", "loans", "--term", "202302"]);

  assert_eq!(out.status.code(), Some(0));
  assert_eq!(json(&out)["filename"], "202302_loans_daily_report.pdf");
  assert!(FakeBackend::recorded_args(td.path()).starts_with("loans_daily pdf 202302 202302"));
}

#[test]
fn day_range_with_empty_end_produces_tsv() {
  let td = tempdir();
  let backend = FakeBackend::write(td.path(), r#"printf 'date\tcount\n%s\t4\n' "$3" > "$5""#);
  let out = run(
    td.path(),
    &backend,
    &["--kind", "day", "--format", "tsv", "--start", "20230115", "--end", ""],
  );

  assert_eq!(out.status.code(), Some(0));
  let v = json(&out);
  assert_eq!(v["filename"], "20230115_20230115_day_report.tsv");
  assert_eq!(v["content_type"], "application/tsv");
  assert_eq!(v["query"]["granularity"], "day_range");

  let written = td.path().join("out").join("20230115_20230115_day_report.tsv");
  assert_eq!(std::fs::read_to_string(written).unwrap(), "date\tcount\n20230115\t4\n");
}

#[test]
fn suffix_override_renames_the_attachment() {
  let td = tempdir();
  let backend = FakeBackend::write(td.path(), r#"printf 'g\n' > "$5""#);
  let out = run(
    td.path(),
    &backend,
    &[
      "--kind",
      "groups",
      "--format",
      "tsv",
      "--term",
      "2023",
      "--suffix",
      "groups_monthly_report=corporate_users",
    ],
  );

  assert_eq!(out.status.code(), Some(0));
  assert_eq!(json(&out)["filename"], "2023_corporate_users.tsv");
  assert!(td.path().join("out").join("2023_corporate_users.tsv").is_file());
}

#[test]
fn reversed_year_range_is_rejected_with_echo() {
  let td = tempdir();
  let backend = FakeBackend::recording(td.path(), "exit 0");
  let out = run(td.path(), &backend, &["--kind", "yearly", "--start", "2022", "--end", "2021"]);

  assert_eq!(out.status.code(), Some(2));
  let v = json(&out);
  assert_eq!(v["status"], "rejected");
  assert_eq!(v["reason"], "invalid_range");
  assert_eq!(v["form"]["yearly"]["start"], "2022");
  assert_eq!(v["form"]["yearly"]["end"], "2021");
  assert_eq!(v["form"]["monthly"]["term"], "2024");
  assert_eq!(v["form"]["groups"]["term"], "202507");
  assert_eq!(FakeBackend::recorded_args(td.path()), "");
  assert!(!td.path().join("out").exists());
}

#[test]
fn impossible_month_is_not_coerced() {
  let td = tempdir();
  let backend = FakeBackend::write(td.path(), "exit 0");
  let out = run(td.path(), &backend, &["--kind", "departments", "--term", "202313"]);

  assert_eq!(out.status.code(), Some(2));
  let v = json(&out);
  assert_eq!(v["reason"], "invalid_calendar_date");
  assert_eq!(v["form"]["departments"]["term"], "202313");
}

#[test]
fn day_term_for_monthly_is_unsupported() {
  let td = tempdir();
  let backend = FakeBackend::write(td.path(), "exit 0");
  let out = run(td.path(), &backend, &["--kind", "monthly", "--term", "20230115"]);

  assert_eq!(out.status.code(), Some(2));
  let v = json(&out);
  assert_eq!(v["reason"], "unsupported_granularity");
  assert!(v["message"].as_str().unwrap().contains("monthly"));
}

#[test]
fn range_endpoints_of_the_wrong_size_are_unsupported() {
  for (kind, start) in [("yearly", "20220101"), ("day", "2022")] {
    let td = tempdir();
    let backend = FakeBackend::recording(td.path(), "exit 0");
    let out = run(td.path(), &backend, &["--kind", kind, "--start", start]);

    assert_eq!(out.status.code(), Some(2), "{kind}");
    let v = json(&out);
    assert_eq!(v["reason"], "unsupported_granularity", "{kind}");
    assert_eq!(v["form"][kind]["start"], start);
    assert_eq!(FakeBackend::recorded_args(td.path()), "");
  }
}

#[test]
fn missing_term_is_malformed() {
  let td = tempdir();
  let backend = FakeBackend::write(td.path(), "exit 0");
  let out = run(td.path(), &backend, &["--kind", "items"]);

  assert_eq!(out.status.code(), Some(2));
  assert_eq!(json(&out)["reason"], "malformed_term");
}

#[test]
fn no_data_reasons_follow_the_kind() {
  for (kind, reason) in [
    ("groups", "no_matching_group"),
    ("departments", "no_matching_department"),
    ("items", "no_matching_data"),
  ] {
    let td = tempdir();
    let backend = FakeBackend::write(td.path(), "exit 3");
    let out = run(td.path(), &backend, &["--kind", kind, "--term", "2023"]);

    assert_eq!(out.status.code(), Some(2), "{kind}");
    let v = json(&out);
    assert_eq!(v["reason"], reason);
    assert_eq!(v["form"][kind]["term"], "2023");
  }
}

#[test]
fn backend_failure_is_fatal() {
  let td = tempdir();
  let backend = FakeBackend::write(td.path(), "echo 'database offline' >&2; exit 7");
  cmd_bin(BIN)
    .args(backend.args())
    .args(["--kind", "age", "--start", "20230101", "--end", "20230131"])
    .args(["--out", td.path().join("out").to_str().unwrap()])
    .assert()
    .code(1)
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("database offline"));
}

#[test]
fn term_and_range_flags_are_ambiguous() {
  let td = tempdir();
  let backend = FakeBackend::write(td.path(), "exit 0");
  cmd_bin(BIN)
    .args(backend.args())
    .args(["--kind", "yearly", "--term", "2023", "--start", "2022"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Ambiguous term selection"));
}

#[test]
fn backend_is_required_to_dispatch() {
  cmd_bin(BIN)
    .args(["--kind", "monthly", "--term", "2023"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("--backend"));
}

#[test]
fn suffix_names_with_path_separators_are_refused() {
  let td = tempdir();
  let backend = FakeBackend::recording(td.path(), r#"printf 'g\n' > "$5""#);
  cmd_bin(BIN)
    .args(backend.args())
    .args(["--kind", "groups", "--format", "tsv", "--term", "2023"])
    .args(["--suffix", "groups_monthly_report=../escaped"])
    .args(["--out", td.path().join("out").to_str().unwrap()])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("must not contain"));
  assert_eq!(FakeBackend::recorded_args(td.path()), "");
  assert!(!td.path().join("escaped.tsv").exists());
}
