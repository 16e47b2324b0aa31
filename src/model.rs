// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define report kinds, term granularities, output formats and the normalized ReportQuery
// role: model/types
// outputs: Serializable enums/structs with stable snake_case names used by CLI flags and JSON responses
// invariants:
// - every ReportKind has exactly one KindRules row (accepted input + default shape)
// - range kinds accept exactly one range granularity; single-value kinds never accept a range
// - ReportQuery has no public mutators; it is built only by normalize::normalize
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Statistic report families.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ReportKind {
  Yearly,
  Monthly,
  Timezone,
  Day,
  Age,
  Items,
  InoutItems,
  Loans,
  Groups,
  Departments,
}

impl ReportKind {
  pub const ALL: [ReportKind; 10] = [
    ReportKind::Yearly,
    ReportKind::Monthly,
    ReportKind::Timezone,
    ReportKind::Day,
    ReportKind::Age,
    ReportKind::Items,
    ReportKind::InoutItems,
    ReportKind::Loans,
    ReportKind::Groups,
    ReportKind::Departments,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      ReportKind::Yearly => "yearly",
      ReportKind::Monthly => "monthly",
      ReportKind::Timezone => "timezone",
      ReportKind::Day => "day",
      ReportKind::Age => "age",
      ReportKind::Items => "items",
      ReportKind::InoutItems => "inout_items",
      ReportKind::Loans => "loans",
      ReportKind::Groups => "groups",
      ReportKind::Departments => "departments",
    }
  }

  /// Which term shapes this kind accepts and how its redisplay default is derived.
  pub fn rules(&self) -> KindRules {
    use Granularity::*;

    const TERM_YEAR_OR_MONTH: TermInput = TermInput::Single(&[Year, YearMonth]);

    match self {
      ReportKind::Yearly => KindRules {
        input: TermInput::Range(YearRange),
        default: DefaultShape::PreviousYearRange,
      },
      ReportKind::Monthly => KindRules {
        input: TERM_YEAR_OR_MONTH,
        default: DefaultShape::PreviousYear,
      },
      ReportKind::Day | ReportKind::Age => KindRules {
        input: TermInput::Range(DayRange),
        default: DefaultShape::PreviousMonthDays,
      },
      ReportKind::Loans => KindRules {
        input: TermInput::Single(&[Year, YearMonth, YearMonthDay]),
        default: DefaultShape::PreviousMonth,
      },
      ReportKind::Timezone
      | ReportKind::Items
      | ReportKind::InoutItems
      | ReportKind::Groups
      | ReportKind::Departments => KindRules {
        input: TERM_YEAR_OR_MONTH,
        default: DefaultShape::PreviousMonth,
      },
    }
  }
}

impl fmt::Display for ReportKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Shape of a validated time expression.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
  /// `YYYY`
  Year,
  /// `YYYYMM`
  YearMonth,
  /// `YYYYMMDD`
  YearMonthDay,
  /// `YYYY`..`YYYY`, inclusive
  YearRange,
  /// `YYYYMMDD`..`YYYYMMDD`, inclusive
  DayRange,
}

impl Granularity {
  /// Shape shared by both endpoints of a range; single shapes are their own endpoint.
  pub fn endpoint(&self) -> Granularity {
    match self {
      Granularity::YearRange => Granularity::Year,
      Granularity::DayRange => Granularity::YearMonthDay,
      other => *other,
    }
  }

  pub fn class(&self) -> GranularityClass {
    match self {
      Granularity::Year | Granularity::YearRange => GranularityClass::Monthly,
      Granularity::YearMonth | Granularity::YearMonthDay | Granularity::DayRange => GranularityClass::Daily,
    }
  }
}

impl fmt::Display for Granularity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Granularity::Year => "YYYY",
      Granularity::YearMonth => "YYYYMM",
      Granularity::YearMonthDay => "YYYYMMDD",
      Granularity::YearRange => "a YYYY..YYYY range",
      Granularity::DayRange => "a YYYYMMDD..YYYYMMDD range",
    };
    f.write_str(s)
  }
}

/// Bucket size a report is broken down by; selects the catalog row.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GranularityClass {
  Monthly,
  Daily,
}

/// How a kind reads its term from the request.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TermInput {
  /// One `term` field in any of the listed shapes.
  Single(&'static [Granularity]),
  /// A `start`/`end` pair forming the given range granularity.
  Range(Granularity),
}

impl TermInput {
  pub fn accepted(&self) -> &'static [Granularity] {
    match self {
      TermInput::Single(shapes) => shapes,
      TermInput::Range(Granularity::YearRange) => &[Granularity::YearRange],
      TermInput::Range(_) => &[Granularity::DayRange],
    }
  }
}

/// "Last completed period" a kind's form field falls back to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DefaultShape {
  PreviousYear,
  PreviousYearRange,
  PreviousMonth,
  PreviousMonthDays,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KindRules {
  pub input: TermInput,
  pub default: DefaultShape,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
  Pdf,
  Tsv,
}

impl OutputFormat {
  pub fn content_type(&self) -> &'static str {
    match self {
      OutputFormat::Pdf => "application/pdf",
      OutputFormat::Tsv => "application/tsv",
    }
  }

  pub fn extension(&self) -> &'static str {
    match self {
      OutputFormat::Pdf => "pdf",
      OutputFormat::Tsv => "tsv",
    }
  }
}

impl fmt::Display for OutputFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.extension())
  }
}

/// Unvalidated term fields exactly as the caller sent them.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawTerm {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub term: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub end: Option<String>,
}

impl RawTerm {
  pub fn term(term: impl Into<String>) -> Self {
    Self { term: Some(term.into()), ..Self::default() }
  }

  pub fn range(start: impl Into<String>, end: impl Into<String>) -> Self {
    Self {
      term: None,
      start: Some(start.into()),
      end: Some(end.into()),
    }
  }
}

/// Validated, normalized input to the report backend.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ReportQuery {
  kind: ReportKind,
  granularity: Granularity,
  start: String,
  end: String,
  format: OutputFormat,
}

impl ReportQuery {
  pub(crate) fn new(kind: ReportKind, granularity: Granularity, start: String, end: String, format: OutputFormat) -> Self {
    Self { kind, granularity, start, end, format }
  }

  pub fn kind(&self) -> ReportKind {
    self.kind
  }

  pub fn granularity(&self) -> Granularity {
    self.granularity
  }

  pub fn class(&self) -> GranularityClass {
    self.granularity.class()
  }

  pub fn start(&self) -> &str {
    &self.start
  }

  pub fn end(&self) -> &str {
    &self.end
  }

  pub fn format(&self) -> OutputFormat {
    self.format
  }
}
