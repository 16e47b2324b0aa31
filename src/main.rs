use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

mod backend;
mod catalog;
mod cli;
mod defaults;
mod dispatch;
mod error;
mod gate;
mod model;
mod normalize;
mod term;
mod transmit;
mod util;

use crate::backend::CommandBackend;
use crate::catalog::{ReportCatalog, SuffixNames};
use crate::cli::{normalize, Cli, DispatchConfig, Mode};
use crate::dispatch::{DispatchOutcome, ReportDispatcher, ReportRequest};
use crate::transmit::{send_attachment, Response};

const EXIT_REJECTED: u8 = 2;
const EXIT_DENIED: u8 = 3;

fn main() -> Result<ExitCode> {
  // Usage errors exit 1 so that 2 stays reserved for rejected terms.
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(e) => {
      e.print()?;
      return Ok(if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS });
    }
  };

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(ExitCode::SUCCESS);
  }

  util::init_tracing();

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: resolve now
  let now = util::effective_now(util::parse_now_override(cfg.now_override.as_deref()));

  // Phase 3: defaults or a single dispatch
  match cfg.mode {
    Mode::Defaults => {
      println!("{}", serde_json::to_string_pretty(&defaults::defaults(now))?);
      Ok(ExitCode::SUCCESS)
    }
    Mode::Dispatch(d) => run_dispatch(&d, now),
  }
}

fn run_dispatch(cfg: &DispatchConfig, now: chrono::DateTime<chrono::Local>) -> Result<ExitCode> {
  if !cfg.gate().is_authorized(&cfg.user) {
    warn!(user = %cfg.user, "user is not allowed to request statistic reports");
    println!("{}", Response::Denied { user: &cfg.user }.to_json()?);
    return Ok(ExitCode::from(EXIT_DENIED));
  }

  let suffixes = SuffixNames::with_overrides(cfg.suffixes.iter().cloned());
  for key in suffixes.unknown_keys() {
    warn!(key, "suffix override does not match any report");
  }
  let catalog = ReportCatalog::new(suffixes);

  let work_dir = util::prepare_work_dir(now)?;
  let backend = CommandBackend::new(&cfg.backend, &work_dir).with_leading_args(cfg.backend_args.clone());

  let request = ReportRequest {
    kind: cfg.kind,
    format: cfg.format,
    raw: cfg.raw.clone(),
  };
  let outcome = ReportDispatcher::new(&backend, &catalog).handle(&request, now);
  let code = respond(outcome, Path::new(&cfg.out));

  if let Err(e) = std::fs::remove_dir_all(&work_dir) {
    warn!(dir = %work_dir.display(), error = %e, "could not remove backend work dir");
  }
  code
}

fn respond(outcome: Result<DispatchOutcome>, out_dir: &Path) -> Result<ExitCode> {
  match outcome? {
    DispatchOutcome::Accepted(artifact) => {
      let written = send_attachment(&artifact, out_dir)?;
      info!(file = %written.display(), "attachment written");
      println!("{}", Response::accepted(&artifact, &written).to_json()?);
      Ok(ExitCode::SUCCESS)
    }
    DispatchOutcome::Rejected(rejection) => {
      println!("{}", Response::rejected(&rejection).to_json()?);
      Ok(ExitCode::from(EXIT_REJECTED))
    }
  }
}
