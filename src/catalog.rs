// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Map (report kind, granularity class, format) to a backend operation and an attachment filename
// role: dispatch/catalog
// inputs: ReportQuery; SuffixNames (built-in names plus CLI overrides)
// outputs: CatalogEntry { operation, suffix_key, template, format } and rendered filenames
// invariants:
// - every (kind, class) reachable from a kind's accepted granularities has exactly one row
// - every row is registered for every OutputFormat
// - a lookup miss is a programming error and panics; it is never reported to the user
// - filenames are <template with {start}/{end}/{suffix}>.<format extension>
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use crate::model::{GranularityClass, OutputFormat, ReportKind, ReportQuery};

const TERM_TEMPLATE: &str = "{start}_{suffix}";
const RANGE_TEMPLATE: &str = "{start}_{end}_{suffix}";

struct Row {
  kind: ReportKind,
  class: GranularityClass,
  operation: &'static str,
  suffix_key: &'static str,
  template: &'static str,
}

const fn row(
  kind: ReportKind,
  class: GranularityClass,
  operation: &'static str,
  suffix_key: &'static str,
  template: &'static str,
) -> Row {
  Row { kind, class, operation, suffix_key, template }
}

use GranularityClass::{Daily, Monthly};
use ReportKind as K;

static ROWS: &[Row] = &[
  row(K::Yearly, Monthly, "yearly", "yearly_report", RANGE_TEMPLATE),
  row(K::Monthly, Monthly, "monthly", "monthly_report", TERM_TEMPLATE),
  row(K::Monthly, Daily, "daily", "daily_report", TERM_TEMPLATE),
  row(K::Timezone, Monthly, "timezone_monthly", "timezone_monthly_report", TERM_TEMPLATE),
  row(K::Timezone, Daily, "timezone_daily", "timezone_daily_report", TERM_TEMPLATE),
  row(K::Day, Daily, "day", "day_report", RANGE_TEMPLATE),
  row(K::Age, Daily, "age", "age_report", RANGE_TEMPLATE),
  row(K::Items, Monthly, "items_monthly", "items_monthly_report", TERM_TEMPLATE),
  row(K::Items, Daily, "items_daily", "items_daily_report", TERM_TEMPLATE),
  row(K::InoutItems, Monthly, "inout_items_monthly", "inout_items_monthly_report", TERM_TEMPLATE),
  row(K::InoutItems, Daily, "inout_items_daily", "inout_items_daily_report", TERM_TEMPLATE),
  row(K::Loans, Monthly, "loans_monthly", "loans_monthly_report", TERM_TEMPLATE),
  row(K::Loans, Daily, "loans_daily", "loans_daily_report", TERM_TEMPLATE),
  row(K::Groups, Monthly, "groups_monthly", "groups_monthly_report", TERM_TEMPLATE),
  row(K::Groups, Daily, "groups_daily", "groups_daily_report", TERM_TEMPLATE),
  row(K::Departments, Monthly, "departments_monthly", "departments_monthly_report", TERM_TEMPLATE),
  row(K::Departments, Daily, "departments_daily", "departments_daily_report", TERM_TEMPLATE),
];

/// A resolved catalog row for one output format.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CatalogEntry {
  pub operation: &'static str,
  pub suffix_key: &'static str,
  pub template: &'static str,
  pub format: OutputFormat,
}

/// Configured filename suffixes; keys without an override use the key itself.
#[derive(Clone, Debug, Default)]
pub struct SuffixNames {
  overrides: BTreeMap<String, String>,
}

impl SuffixNames {
  pub fn with_overrides<I>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (String, String)>,
  {
    Self {
      overrides: pairs.into_iter().collect(),
    }
  }

  pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
    self.overrides.get(key).map(String::as_str).unwrap_or(key)
  }

  /// Suffix keys that have no catalog row; usually a typo on the command line.
  pub fn unknown_keys(&self) -> Vec<&str> {
    self
      .overrides
      .keys()
      .map(String::as_str)
      .filter(|k| !ROWS.iter().any(|r| r.suffix_key == *k))
      .collect()
  }
}

#[derive(Clone, Debug, Default)]
pub struct ReportCatalog {
  suffixes: SuffixNames,
}

impl ReportCatalog {
  pub fn new(suffixes: SuffixNames) -> Self {
    Self { suffixes }
  }

  /// Look up the row for a combination.
  ///
  /// # Panics
  /// When the combination is not registered; validated queries never reach that.
  pub fn lookup(&self, kind: ReportKind, class: GranularityClass, format: OutputFormat) -> CatalogEntry {
    ROWS
      .iter()
      .find(|r| r.kind == kind && r.class == class)
      .map(|r| CatalogEntry {
        operation: r.operation,
        suffix_key: r.suffix_key,
        template: r.template,
        format,
      })
      .unwrap_or_else(|| panic!("report catalog has no entry for {kind} / {class:?} / {format}"))
  }

  pub fn entry_for(&self, query: &ReportQuery) -> CatalogEntry {
    self.lookup(query.kind(), query.class(), query.format())
  }

  pub fn filename(&self, entry: &CatalogEntry, query: &ReportQuery) -> String {
    let stem = entry
      .template
      .replace("{start}", query.start())
      .replace("{end}", query.end())
      .replace("{suffix}", self.suffixes.resolve(entry.suffix_key));
    format!("{stem}.{}", entry.format.extension())
  }
}
