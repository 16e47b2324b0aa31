// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Hand artifacts to the attachment responder and shape JSON responses for the presentation layer
// role: persistence/response
// inputs: Artifact (bytes or staged file), Rejection, output directory
// outputs: <out_dir>/<filename> on disk; Response JSON { status, ... } for stdout
// side_effects: Creates out_dir; writes or copies the artifact
// invariants:
// - the written file name is exactly the catalog-computed filename
// - rejected responses always carry the full form state
// errors: IO errors surfaced with full path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::defaults::FormState;
use crate::dispatch::{Artifact, ArtifactBody, Rejection};
use crate::model::ReportQuery;

/// Write the artifact under its attachment filename inside `out_dir`.
pub fn send_attachment(artifact: &Artifact, out_dir: &Path) -> Result<PathBuf> {
  std::fs::create_dir_all(out_dir).with_context(|| format!("creating output dir {}", out_dir.display()))?;
  let path = out_dir.join(&artifact.filename);

  match &artifact.body {
    ArtifactBody::Bytes(bytes) => {
      std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    }
    ArtifactBody::File(staged) => {
      std::fs::copy(staged, &path)
        .with_context(|| format!("copying {} to {}", staged.display(), path.display()))?;
    }
  }

  Ok(path)
}

/// JSON printed on stdout for every request.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<'a> {
  Accepted {
    file: String,
    filename: &'a str,
    content_type: &'a str,
    query: &'a ReportQuery,
  },
  Rejected {
    reason: &'static str,
    message: String,
    form: &'a FormState,
  },
  Denied {
    user: &'a str,
  },
}

impl<'a> Response<'a> {
  pub fn accepted(artifact: &'a Artifact, written: &Path) -> Self {
    Response::Accepted {
      file: written.to_string_lossy().to_string(),
      filename: &artifact.filename,
      content_type: artifact.content_type,
      query: &artifact.query,
    }
  }

  pub fn rejected(rejection: &'a Rejection) -> Self {
    Response::Rejected {
      reason: rejection.reason.key(),
      message: rejection.reason.to_string(),
      form: &rejection.form,
    }
  }

  pub fn to_json(&self) -> Result<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}
