use jsonschema::validator_for;
use test_support::{cmd_bin, tempdir, FakeBackend, BIN};

fn read_schema(name: &str) -> serde_json::Value {
  let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
  let path = manifest_dir.join("tests").join("schemas").join(name);
  let data = std::fs::read(&path).expect("schema file");
  serde_json::from_slice(&data).expect("valid schema JSON")
}

fn compile_schema(name: &str) -> jsonschema::Validator {
  let schema = read_schema(name);
  validator_for(&schema).expect("compile schema")
}

fn stdout_json(args: &[&str], backend: &FakeBackend) -> serde_json::Value {
  let out = cmd_bin(BIN)
    .args(backend.args())
    .args(["--now-override", "2025-08-15T12:00:00"])
    .args(args)
    .output()
    .unwrap();
  serde_json::from_slice(&out.stdout).expect("stdout JSON")
}

#[test]
fn accepted_response_conforms_to_schema() {
  let td = tempdir();
  let backend = FakeBackend::write(td.path(), r#"printf 'x\n' > "$5""#);
  let out_dir = td.path().join("out");
  let v = stdout_json(
    &["--kind", "inout_items", "--format", "tsv", "--term", "2024", "--out", out_dir.to_str().unwrap()],
    &backend,
  );

  assert_eq!(v["status"], "accepted");
  compile_schema("response.schema.json")
    .validate(&v)
    .expect("schema validation failed for accepted response");
}

#[test]
fn rejected_response_and_form_conform_to_schemas() {
  let td = tempdir();
  let backend = FakeBackend::write(td.path(), "exit 3");

  for args in [
    &["--kind", "age", "--start", "20230230"][..],
    &["--kind", "departments", "--term", "2023"][..],
  ] {
    let v = stdout_json(args, &backend);
    assert_eq!(v["status"], "rejected");
    compile_schema("response.schema.json")
      .validate(&v)
      .expect("schema validation failed for rejected response");
    compile_schema("form.schema.json")
      .validate(&v["form"])
      .expect("schema validation failed for echoed form");
  }
}

#[test]
fn denied_response_conforms_to_schema() {
  let td = tempdir();
  let backend = FakeBackend::write(td.path(), "exit 0");
  let v = stdout_json(&["--kind", "loans", "--term", "2024", "--allow-user", "a"], &backend);
  assert_eq!(v["status"], "denied");
  assert!(compile_schema("response.schema.json").is_valid(&v));
}

#[test]
fn defaults_conform_to_form_schema() {
  let out = cmd_bin(BIN).args(["--defaults"]).output().unwrap();
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert!(compile_schema("form.schema.json").is_valid(&v));
}
