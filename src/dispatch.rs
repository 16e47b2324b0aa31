// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one report request: validate -> normalize -> catalog lookup -> backend -> artifact or rejection
// role: processing/orchestrator
// inputs: ReportRequest { kind, format, raw term fields }, now, a ReportBackend, a ReportCatalog
// outputs: DispatchOutcome::Accepted(Artifact) or DispatchOutcome::Rejected(Rejection)
// side_effects: Only those of the backend call
// invariants:
// - Invalid and NoData both resolve to Rejection { reason, form } with fresh defaults and the failed kind echoed
// - a valid request yields exactly one artifact
// - backend errors propagate unchanged; they are never turned into rejections
// errors: Propagates backend failures as anyhow::Error
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::backend::{Produced, ReportBackend};
use crate::catalog::ReportCatalog;
use crate::defaults::{defaults, FormState};
use crate::error::RejectReason;
use crate::model::{OutputFormat, RawTerm, ReportKind, ReportQuery};
use crate::normalize::normalize;
use crate::term::validate;

#[derive(Clone, Debug)]
pub struct ReportRequest {
  pub kind: ReportKind,
  pub format: OutputFormat,
  pub raw: RawTerm,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ArtifactBody {
  Bytes(Vec<u8>),
  File(PathBuf),
}

/// A produced report ready for the attachment responder.
#[derive(Clone, Debug)]
pub struct Artifact {
  pub query: ReportQuery,
  pub filename: String,
  pub content_type: &'static str,
  pub body: ArtifactBody,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rejection {
  pub reason: RejectReason,
  pub form: FormState,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationOutcome {
  Accepted(ReportQuery),
  Rejected(Rejection),
}

#[derive(Clone, Debug)]
pub enum DispatchOutcome {
  Accepted(Artifact),
  Rejected(Rejection),
}

fn reject(request: &ReportRequest, reason: RejectReason, now: DateTime<Local>) -> Rejection {
  info!(kind = %request.kind, reason = reason.key(), "report request rejected");
  Rejection {
    form: defaults(now).echo(request.kind, &request.raw),
    reason,
  }
}

/// Validate and normalize without touching the backend.
pub fn evaluate(request: &ReportRequest, now: DateTime<Local>) -> ValidationOutcome {
  debug!(kind = %request.kind, raw = ?request.raw, "validating term");
  match validate(request.kind, &request.raw) {
    Ok(expr) => {
      debug!(kind = %request.kind, granularity = ?expr.granularity(), "normalizing term");
      ValidationOutcome::Accepted(normalize(request.kind, expr, request.format))
    }
    Err(err) => ValidationOutcome::Rejected(reject(request, err.into(), now)),
  }
}

pub struct ReportDispatcher<'a, B: ReportBackend + ?Sized> {
  backend: &'a B,
  catalog: &'a ReportCatalog,
}

impl<'a, B: ReportBackend + ?Sized> ReportDispatcher<'a, B> {
  pub fn new(backend: &'a B, catalog: &'a ReportCatalog) -> Self {
    Self { backend, catalog }
  }

  pub fn handle(&self, request: &ReportRequest, now: DateTime<Local>) -> Result<DispatchOutcome> {
    let query = match evaluate(request, now) {
      ValidationOutcome::Accepted(query) => query,
      ValidationOutcome::Rejected(rejection) => return Ok(DispatchOutcome::Rejected(rejection)),
    };

    let entry = self.catalog.entry_for(&query);
    debug!(operation = entry.operation, format = %entry.format, "dispatching to report backend");

    let body = match query.format() {
      OutputFormat::Pdf => self.backend.render_pdf(entry.operation, &query)?.map(ArtifactBody::Bytes),
      OutputFormat::Tsv => self.backend.render_tsv(entry.operation, &query)?.map(ArtifactBody::File),
    };

    let body = match body {
      Produced::Data(body) => body,
      Produced::NoData => {
        let reason = RejectReason::no_data_for(request.kind);
        return Ok(DispatchOutcome::Rejected(reject(request, reason, now)));
      }
    };

    let filename = self.catalog.filename(&entry, &query);
    info!(kind = %query.kind(), %filename, "report produced");
    Ok(DispatchOutcome::Accepted(Artifact {
      content_type: query.format().content_type(),
      filename,
      query,
      body,
    }))
  }
}
