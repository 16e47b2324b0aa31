// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Contract for the external report generator plus a subprocess-backed implementation
// role: integration/backend
// inputs: catalog operation name, ReportQuery
// outputs: Produced::Data (PDF bytes or TSV file path) or Produced::NoData
// side_effects: CommandBackend spawns the configured program; TSV output is written into its work dir
// invariants:
// - "nothing to report" is the NoData variant, never an Err
// - exit code NO_DATA_EXIT_CODE means NoData; any other non-zero exit is an error carrying the command and stderr
// - a TSV success must leave the promised file behind
// errors: spawn failures and unexpected exits surface with command context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::model::ReportQuery;

/// Exit status a backend program uses to say "no applicable data".
pub const NO_DATA_EXIT_CODE: i32 = 3;

/// Result of a report-producing call that did not fail.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Produced<T> {
  Data(T),
  NoData,
}

impl<T> Produced<T> {
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Produced<U> {
    match self {
      Produced::Data(v) => Produced::Data(f(v)),
      Produced::NoData => Produced::NoData,
    }
  }
}

/// External report generator, one call per format.
pub trait ReportBackend {
  fn render_pdf(&self, operation: &str, query: &ReportQuery) -> Result<Produced<Vec<u8>>>;

  /// TSV output is handed over as a file rather than in memory.
  fn render_tsv(&self, operation: &str, query: &ReportQuery) -> Result<Produced<PathBuf>>;
}

/// Runs `PROGRAM [LEADING..] <operation> <format> <start> <end> [<tsv path>]`.
#[derive(Clone, Debug)]
pub struct CommandBackend {
  program: String,
  leading_args: Vec<String>,
  work_dir: PathBuf,
}

impl CommandBackend {
  pub fn new(program: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      leading_args: Vec::new(),
      work_dir: work_dir.into(),
    }
  }

  /// Arguments placed before the operation, e.g. a script path for an interpreter.
  pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
    self.leading_args = args;
    self
  }

  fn run(&self, args: &[String]) -> Result<Option<Vec<u8>>> {
    debug!(program = %self.program, ?args, "invoking report backend");
    let out = Command::new(&self.program)
      .args(&self.leading_args)
      .args(args)
      .output()
      .with_context(|| format!("spawning report backend {} {:?}", self.program, args))?;

    if out.status.success() {
      return Ok(Some(out.stdout));
    }
    if out.status.code() == Some(NO_DATA_EXIT_CODE) {
      return Ok(None);
    }
    let stderr = String::from_utf8_lossy(&out.stderr);
    bail!("report backend {} {:?} failed ({}): {}", self.program, args, out.status, stderr.trim())
  }

  fn args(operation: &str, query: &ReportQuery) -> Vec<String> {
    vec![
      operation.to_string(),
      query.format().to_string(),
      query.start().to_string(),
      query.end().to_string(),
    ]
  }

  fn tsv_path(&self, operation: &str, query: &ReportQuery) -> PathBuf {
    self
      .work_dir
      .join(format!("{}-{}-{}.tsv", operation, query.start(), query.end()))
  }
}

impl ReportBackend for CommandBackend {
  fn render_pdf(&self, operation: &str, query: &ReportQuery) -> Result<Produced<Vec<u8>>> {
    Ok(match self.run(&Self::args(operation, query))? {
      Some(bytes) => Produced::Data(bytes),
      None => Produced::NoData,
    })
  }

  fn render_tsv(&self, operation: &str, query: &ReportQuery) -> Result<Produced<PathBuf>> {
    std::fs::create_dir_all(&self.work_dir)
      .with_context(|| format!("creating backend work dir {}", self.work_dir.display()))?;
    let path = self.tsv_path(operation, query);
    let mut args = Self::args(operation, query);
    args.push(path.to_string_lossy().to_string());

    match self.run(&args)? {
      Some(_) => {
        ensure_written(&path)?;
        Ok(Produced::Data(path))
      }
      None => Ok(Produced::NoData),
    }
  }
}

fn ensure_written(path: &Path) -> Result<()> {
  if !path.is_file() {
    bail!("report backend reported success but did not write {}", path.display());
  }
  Ok(())
}
