// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for paths, the effective "now", backend work dirs, logging setup, and man page rendering
// role: utilities/helpers
// inputs: Various primitives; DateTime; paths; clap CommandFactory
// outputs: Canonicalized paths, the effective now, directories ensured, man page text
// side_effects: prepare_work_dir creates directories; init_tracing installs the global subscriber
// invariants:
// - prepare_work_dir returns an existing directory named after the effective now
// - parse_now_override accepts RFC3339 or naive local "%Y-%m-%dT%H:%M:%S"; anything else is None and logged
// errors: IO errors bubble with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::CommandFactory;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

pub fn canonicalize_lossy<P: AsRef<Path>>(p: P) -> String {
  let p = p.as_ref();
  let pb: PathBuf = match std::fs::canonicalize(p) {
    Ok(x) => x,
    Err(_) => match std::env::current_dir() {
      Ok(cwd) => cwd.join(p),
      Err(_) => PathBuf::from(p),
    },
  };
  pb.to_string_lossy().to_string()
}

/// Returns the effective "now" given an optional override.
///
/// When `override_now` is `Some`, that instant is returned; otherwise
/// the current local time is used.
pub fn effective_now(override_now: Option<DateTime<Local>>) -> DateTime<Local> {
  override_now.unwrap_or_else(Local::now)
}

/// Parse the hidden `--now-override` value; an unparseable value is logged and ignored.
pub fn parse_now_override(s: Option<&str>) -> Option<DateTime<Local>> {
  s.and_then(|raw| {
    let parsed = chrono::DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.with_timezone(&Local))
      .or_else(|| {
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
          .ok()
          .and_then(|ndt| ndt.and_local_timezone(Local).single())
      });
    if parsed.is_none() {
      warn!(value = raw, "ignoring unparseable --now-override; using the current time");
    }
    parsed
  })
}

/// Scratch directory the report backend writes TSV files into.
pub fn prepare_work_dir(now: DateTime<Local>) -> Result<PathBuf> {
  let dir = std::env::temp_dir().join(format!(
    "statistic-report-{}-{}",
    now.format("%Y%m%d-%H%M%S"),
    std::process::id()
  ));
  std::fs::create_dir_all(&dir).with_context(|| format!("creating work dir {}", dir.display()))?;
  Ok(dir)
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the default `warn` level.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let _ = fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
