use crate::model::{OutputFormat, ReportKind, ReportQuery};
use crate::term::TimeExpression;

/// Turn a validated expression into the backend query.
///
/// Single values become `start == end`; callers needing an interval derive it
/// from `granularity`. Ranges arrive with their end already defaulted.
pub fn normalize(kind: ReportKind, expr: TimeExpression, format: OutputFormat) -> ReportQuery {
  let granularity = expr.granularity();
  let (start, end) = match expr {
    TimeExpression::Year(v) | TimeExpression::YearMonth(v) | TimeExpression::YearMonthDay(v) => (v.clone(), v),
    TimeExpression::YearRange { start, end } | TimeExpression::DayRange { start, end } => (start, end),
  };
  ReportQuery::new(kind, granularity, start, end, format)
}
