// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Compute the redisplay form state (one default per report kind) from an explicit "now"
// role: defaults/form-state
// inputs: now (DateTime<Local>); optionally the caller's RawTerm to echo into one kind's field
// outputs: FormState serializable as a JSON object keyed by report kind
// invariants:
// - defaults(now) is pure: same now, same FormState; every field is non-empty and passes validation
// - fields are derived fresh per call; only FormState::echo ever puts caller input into a field
// - year boundaries roll back correctly (January -> previous December)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Local, NaiveDate};
use serde::Serialize;

use crate::model::{DefaultShape, RawTerm, ReportKind, TermInput};

/// One form field: a bare term or a start/end pair.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormValue {
  Term { term: String },
  Range { start: String, end: String },
}

/// Every field the request form needs to redisplay.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormState {
  fields: BTreeMap<ReportKind, FormValue>,
}

impl FormState {
  pub fn get(&self, kind: ReportKind) -> Option<&FormValue> {
    self.fields.get(&kind)
  }

  /// Overwrite `kind`'s field with what the caller typed, leaving all other kinds untouched.
  ///
  /// Fields the caller did not send keep their default.
  pub fn echo(mut self, kind: ReportKind, raw: &RawTerm) -> Self {
    if let Some(field) = self.fields.get_mut(&kind) {
      match field {
        FormValue::Term { term } => {
          if let Some(typed) = &raw.term {
            *term = typed.clone();
          }
        }
        FormValue::Range { start, end } => {
          if let Some(typed) = &raw.start {
            *start = typed.clone();
          }
          if let Some(typed) = &raw.end {
            *end = typed.clone();
          }
        }
      }
    }
    self
  }
}

/// Last completed periods relative to a given day.
struct Periods {
  previous_year: String,
  previous_month: String,
  previous_month_first: String,
  previous_month_last: String,
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
  let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
  NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

fn periods(today: NaiveDate) -> Periods {
  let (y, m) = (today.year(), today.month());
  let (last_y, last_m) = if m == 1 { (y - 1, 12) } else { (y, m - 1) };

  let first = NaiveDate::from_ymd_opt(last_y, last_m, 1).unwrap_or(today);
  let last = last_day_of_month(last_y, last_m).unwrap_or(today);

  Periods {
    previous_year: format!("{:04}", y - 1),
    previous_month: format!("{last_y:04}{last_m:02}"),
    previous_month_first: first.format("%Y%m%d").to_string(),
    previous_month_last: last.format("%Y%m%d").to_string(),
  }
}

/// Fresh defaults for every report kind, derived only from `now`.
pub fn defaults(now: DateTime<Local>) -> FormState {
  let p = periods(now.date_naive());

  let fields = ReportKind::ALL
    .iter()
    .map(|kind| {
      let value = match kind.rules().default {
        DefaultShape::PreviousYear => FormValue::Term { term: p.previous_year.clone() },
        DefaultShape::PreviousMonth => FormValue::Term { term: p.previous_month.clone() },
        DefaultShape::PreviousYearRange => FormValue::Range {
          start: p.previous_year.clone(),
          end: p.previous_year.clone(),
        },
        DefaultShape::PreviousMonthDays => FormValue::Range {
          start: p.previous_month_first.clone(),
          end: p.previous_month_last.clone(),
        },
      };
      debug_assert_eq!(
        matches!(value, FormValue::Range { .. }),
        matches!(kind.rules().input, TermInput::Range(_)),
        "default shape of {kind} disagrees with its input"
      );
      (*kind, value)
    })
    .collect();

  FormState { fields }
}
