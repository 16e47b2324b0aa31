use anyhow::{bail, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::gate::{AllowList, AuthorizationGate, OpenGate};
use crate::model::{OutputFormat, RawTerm, ReportKind};
use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "statistic-report-dispatch",
    version,
    about = "Validate a statistic report term and produce the report (PDF or TSV)",
    long_about = None
)]
pub struct Cli {
  /// Report family, e.g. monthly or groups
  #[arg(long, value_enum)]
  pub kind: Option<ReportKind>,

  /// Output format
  #[arg(long, value_enum, default_value_t = OutputFormat::Pdf)]
  pub format: OutputFormat,

  /// Single term: YYYY, YYYYMM or YYYYMMDD depending on the kind
  #[arg(long, allow_hyphen_values = true)]
  pub term: Option<String>,

  /// Range start (yearly, day, age)
  #[arg(long, allow_hyphen_values = true)]
  pub start: Option<String>,

  /// Range end; empty means the same as --start
  #[arg(long, allow_hyphen_values = true)]
  pub end: Option<String>,

  /// Report generator program; called as PROGRAM [ARGS..] <operation> <format> <start> <end> [<tsv path>]
  #[arg(long)]
  pub backend: Option<String>,

  /// Extra leading argument for the backend program (repeatable)
  #[arg(long = "backend-arg", allow_hyphen_values = true)]
  pub backend_args: Vec<String>,

  /// Directory the produced attachment is written into
  #[arg(long, default_value = ".")]
  pub out: PathBuf,

  /// Override a filename suffix, e.g. groups_monthly_report=corporate_users (repeatable)
  #[arg(long = "suffix", value_parser = parse_suffix)]
  pub suffixes: Vec<(String, String)>,

  /// Requesting user, checked against --allow-user
  #[arg(long)]
  pub user: Option<String>,

  /// Users allowed to request reports (repeatable; none means everyone)
  #[arg(long = "allow-user")]
  pub allow_users: Vec<String>,

  /// Print the default form values for every kind and exit
  #[arg(long)]
  pub defaults: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant used for defaults (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

fn parse_suffix(s: &str) -> Result<(String, String), String> {
  match s.split_once('=') {
    Some((key, name)) if !key.trim().is_empty() && !name.trim().is_empty() => {
      let name = name.trim();
      // The name becomes part of a file name inside --out.
      if name.contains(['/', '\\']) || name.contains("..") {
        return Err(format!("suffix name must not contain '/', '\\' or '..', got '{name}'"));
      }
      Ok((key.trim().to_string(), name.to_string()))
    }
    _ => Err(format!("expected KEY=NAME, got '{s}'")),
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DispatchConfig {
  pub kind: ReportKind,
  pub format: OutputFormat,
  pub raw: RawTerm,
  pub backend: String,
  pub backend_args: Vec<String>,
  pub out: String, // absolute path for stability
  pub suffixes: Vec<(String, String)>,
  pub user: String,
  pub allow_users: Vec<String>,
}

impl DispatchConfig {
  pub fn gate(&self) -> Box<dyn AuthorizationGate> {
    if self.allow_users.is_empty() {
      Box::new(OpenGate)
    } else {
      Box::new(AllowList::new(self.allow_users.iter().cloned()))
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
  Defaults,
  Dispatch(DispatchConfig),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EffectiveConfig {
  pub mode: Mode,
  pub now_override: Option<String>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  if cli.defaults {
    return Ok(EffectiveConfig {
      mode: Mode::Defaults,
      now_override: cli.now_override,
    });
  }

  let Some(kind) = cli.kind else {
    bail!("Provide --kind (or --defaults)");
  };
  let Some(backend) = cli.backend else {
    bail!("Provide --backend <PROGRAM> to produce reports");
  };

  let raw = match (cli.term, cli.start, cli.end) {
    (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
      bail!("Ambiguous term selection: choose only one of --term | --start/--end")
    }
    (term, start, end) => RawTerm { term, start, end },
  };

  Ok(EffectiveConfig {
    mode: Mode::Dispatch(DispatchConfig {
      kind,
      format: cli.format,
      raw,
      backend,
      backend_args: cli.backend_args,
      out: util::canonicalize_lossy(&cli.out),
      suffixes: cli.suffixes,
      user: cli.user.unwrap_or_default(),
      allow_users: cli.allow_users,
    }),
    now_override: cli.now_override,
  })
}
