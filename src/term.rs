// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Decide whether a caller-supplied term is well-formed and calendar-valid for a report kind
// role: validation/terms
// inputs: ReportKind, RawTerm { term?, start?, end? }
// outputs: TimeExpression tagged with its Granularity, or a ValidationError naming the expected shape
// invariants:
// - every field is trimmed before any pattern check; shapes are ASCII [0-9] only
// - shape is chosen by digit count, then kind acceptance, then calendar validity (never retried as another shape)
// - YYYYMMDD must survive a parse/format round trip unchanged
// - an empty range end defaults to start here and nowhere else
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Expected, ValidationError};
use crate::model::{Granularity, RawTerm, ReportKind, TermInput};

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").unwrap());
static YEAR_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{6}$").unwrap());
static YEAR_MONTH_DAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{8}$").unwrap());

const DAY_FORMAT: &str = "%Y%m%d";

/// A term that passed validation, carrying its shape.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TimeExpression {
  Year(String),
  YearMonth(String),
  YearMonthDay(String),
  YearRange { start: String, end: String },
  DayRange { start: String, end: String },
}

impl TimeExpression {
  pub fn granularity(&self) -> Granularity {
    match self {
      TimeExpression::Year(_) => Granularity::Year,
      TimeExpression::YearMonth(_) => Granularity::YearMonth,
      TimeExpression::YearMonthDay(_) => Granularity::YearMonthDay,
      TimeExpression::YearRange { .. } => Granularity::YearRange,
      TimeExpression::DayRange { .. } => Granularity::DayRange,
    }
  }

  fn single(shape: Granularity, value: String) -> Self {
    match shape {
      Granularity::Year => TimeExpression::Year(value),
      Granularity::YearMonth => TimeExpression::YearMonth(value),
      _ => TimeExpression::YearMonthDay(value),
    }
  }
}

/// Any four ASCII digits; no calendar check.
pub fn is_year(value: &str) -> bool {
  YEAR.is_match(value)
}

/// Six digits naming a real month (checked by appending day `01`).
pub fn is_year_month(value: &str) -> bool {
  YEAR_MONTH.is_match(value) && NaiveDate::parse_from_str(&format!("{value}01"), DAY_FORMAT).is_ok()
}

/// Eight digits naming a real day, in canonical form.
pub fn is_year_month_day(value: &str) -> bool {
  YEAR_MONTH_DAY.is_match(value)
    && NaiveDate::parse_from_str(value, DAY_FORMAT)
      .map(|d| d.format(DAY_FORMAT).to_string() == value)
      .unwrap_or(false)
}

/// Shape implied by digit count alone.
fn shape_of(value: &str) -> Option<Granularity> {
  if YEAR.is_match(value) {
    Some(Granularity::Year)
  } else if YEAR_MONTH.is_match(value) {
    Some(Granularity::YearMonth)
  } else if YEAR_MONTH_DAY.is_match(value) {
    Some(Granularity::YearMonthDay)
  } else {
    None
  }
}

fn is_calendar_valid(shape: Granularity, value: &str) -> bool {
  match shape {
    Granularity::Year => is_year(value),
    Granularity::YearMonth => is_year_month(value),
    _ => is_year_month_day(value),
  }
}

fn trimmed(field: &Option<String>) -> &str {
  field.as_deref().map(str::trim).unwrap_or("")
}

/// Validate the raw term fields against what `kind` accepts.
pub fn validate(kind: ReportKind, raw: &RawTerm) -> Result<TimeExpression, ValidationError> {
  let input = kind.rules().input;
  match input {
    TermInput::Single(_) => validate_single(kind, input.accepted(), trimmed(&raw.term)),
    TermInput::Range(range) => validate_range(kind, range, trimmed(&raw.start), trimmed(&raw.end)),
  }
}

fn validate_single(kind: ReportKind, accepted: &'static [Granularity], term: &str) -> Result<TimeExpression, ValidationError> {
  let found = shape_of(term).ok_or(ValidationError::MalformedTerm { expected: Expected(accepted) })?;

  if !accepted.contains(&found) {
    return Err(ValidationError::UnsupportedGranularityForKind { kind, found });
  }
  if !is_calendar_valid(found, term) {
    return Err(ValidationError::InvalidCalendarDate { expected: found });
  }

  Ok(TimeExpression::single(found, term.to_string()))
}

fn validate_range(kind: ReportKind, range: Granularity, start: &str, end: &str) -> Result<TimeExpression, ValidationError> {
  let endpoint = range.endpoint();
  let end = if end.is_empty() { start } else { end };

  check_endpoint(kind, endpoint, start)?;
  check_endpoint(kind, endpoint, end)?;

  // Fixed-width digit strings: lexicographic order is numeric order.
  if start > end {
    return Err(ValidationError::InvalidRange);
  }

  let (start, end) = (start.to_string(), end.to_string());
  Ok(match range {
    Granularity::YearRange => TimeExpression::YearRange { start, end },
    _ => TimeExpression::DayRange { start, end },
  })
}

// A well-shaped endpoint of the wrong size is unsupported, not malformed.
fn check_endpoint(kind: ReportKind, endpoint: Granularity, value: &str) -> Result<(), ValidationError> {
  match shape_of(value) {
    None => {
      let expected = match endpoint {
        Granularity::Year => Expected(&[Granularity::Year]),
        _ => Expected(&[Granularity::YearMonthDay]),
      };
      return Err(ValidationError::MalformedTerm { expected });
    }
    Some(found) if found != endpoint => {
      return Err(ValidationError::UnsupportedGranularityForKind { kind, found });
    }
    Some(_) => {}
  }
  if !is_calendar_valid(endpoint, value) {
    return Err(ValidationError::InvalidCalendarDate { expected: endpoint });
  }
  Ok(())
}
