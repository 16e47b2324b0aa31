// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed rejection taxonomy for term validation and soft "no data" backend outcomes
// role: model/errors
// outputs: ValidationError (term shape/calendar/range/kind mismatch) and RejectReason (user-correctable outcomes)
// invariants:
// - errors carry the expected shape only, never partial term data
// - reason keys are stable snake_case identifiers for the presentation layer
// - backend faults are NOT represented here; they travel as anyhow::Error
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use thiserror::Error;

use crate::model::{Granularity, ReportKind};

/// Shapes a term was expected to match, rendered as `YYYY or YYYYMM`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Expected(pub &'static [Granularity]);

impl fmt::Display for Expected {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, shape) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str(" or ")?;
      }
      write!(f, "{shape}")?;
    }
    Ok(())
  }
}

/// Why a caller-supplied term was not accepted.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ValidationError {
  #[error("term must be {expected}")]
  MalformedTerm { expected: Expected },

  #[error("term has the {expected} shape but is not a real calendar date")]
  InvalidCalendarDate { expected: Granularity },

  #[error("start of the range is later than its end")]
  InvalidRange,

  #[error("{kind} reports do not accept {found} terms")]
  UnsupportedGranularityForKind { kind: ReportKind, found: Granularity },
}

/// Every soft failure that resolves to a redisplayed form.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RejectReason {
  #[error(transparent)]
  Invalid(#[from] ValidationError),

  #[error("no corporate group has statistics for this period")]
  NoMatchingGroup,

  #[error("no department has statistics for this period")]
  NoMatchingDepartment,

  #[error("no statistics exist for this period")]
  NoMatchingData,
}

impl RejectReason {
  /// The backend reported nothing to render for `kind`.
  pub fn no_data_for(kind: ReportKind) -> Self {
    match kind {
      ReportKind::Groups => RejectReason::NoMatchingGroup,
      ReportKind::Departments => RejectReason::NoMatchingDepartment,
      _ => RejectReason::NoMatchingData,
    }
  }

  pub fn key(&self) -> &'static str {
    match self {
      RejectReason::Invalid(ValidationError::MalformedTerm { .. }) => "malformed_term",
      RejectReason::Invalid(ValidationError::InvalidCalendarDate { .. }) => "invalid_calendar_date",
      RejectReason::Invalid(ValidationError::InvalidRange) => "invalid_range",
      RejectReason::Invalid(ValidationError::UnsupportedGranularityForKind { .. }) => "unsupported_granularity",
      RejectReason::NoMatchingGroup => "no_matching_group",
      RejectReason::NoMatchingDepartment => "no_matching_department",
      RejectReason::NoMatchingData => "no_matching_data",
    }
  }
}
