use crate::models::{IndicatorRecord, Metric, YearFilter};
use serde::{Deserialize, Serialize};

/// Headline numbers shown above the cards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreSummary {
    /// Number of records in the current selection.
    pub count: usize,
    /// Mean `NOTA_INTELIGENTE` × 100, rounded to one decimal. 0 for an empty selection.
    pub mean_smart_pct: f64,
    /// Mean `NOTA_SUSTENTAVEL` × 100, rounded to one decimal. 0 for an empty selection.
    pub mean_sustainable_pct: f64,
}

/// Derived view over a slice of records. Borrows from the input, never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView<'a> {
    /// Filter that produced `records`.
    pub filter: YearFilter,
    /// Distinct years of valid records, ascending.
    pub years: Vec<i32>,
    /// Valid records matching `filter`, by composite score descending.
    pub records: Vec<&'a IndicatorRecord>,
    /// Records dropped because a score was missing or not a number.
    pub invalid: usize,
    pub summary: ScoreSummary,
}

/// Valid records sorted by composite score, highest first. Ties keep input order.
pub fn ranked(records: &[IndicatorRecord]) -> Vec<&IndicatorRecord> {
    let mut valid: Vec<&IndicatorRecord> = records.iter().filter(|r| r.is_valid()).collect();
    // `sort_by` is stable; the key is never NaN so `total_cmp` is a total order
    valid.sort_by(|a, b| rank_key(b).total_cmp(&rank_key(a)));
    valid
}

/// Composite score as a sort key. `inf + -inf` sinks to the bottom, `-0.0` ties with `0.0`.
fn rank_key(record: &IndicatorRecord) -> f64 {
    match record.composite_score() {
        Some(c) if !c.is_nan() => c + 0.0,
        _ => f64::NEG_INFINITY,
    }
}

/// Distinct years among valid records, ascending. Records without a year are skipped.
pub fn distinct_years(records: &[IndicatorRecord]) -> Vec<i32> {
    let mut years: Vec<i32> = records
        .iter()
        .filter(|r| r.is_valid())
        .filter_map(|r| r.year)
        .collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Mean of `metric` over `records` as a percentage rounded to one decimal.
///
/// Missing or NaN values count as 0 but still count towards the denominator.
/// An empty selection yields exactly 0.
pub fn mean_percent(records: &[&IndicatorRecord], metric: Metric) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records
        .iter()
        .map(|r| r.metric(metric).filter(|v| !v.is_nan()).unwrap_or(0.0))
        .sum();
    round1(sum / records.len() as f64 * 100.0)
}

/// Build the dashboard view for `filter`.
///
/// 1. drop invalid records
/// 2. sort by composite score, descending and stable
/// 3. collect distinct years
/// 4. apply the year filter
/// 5. summarize the selection
pub fn aggregate(records: &[IndicatorRecord], filter: YearFilter) -> DashboardView<'_> {
    let sorted = ranked(records);
    let invalid = records.len() - sorted.len();
    let years = distinct_years(records);
    let selected: Vec<&IndicatorRecord> =
        sorted.into_iter().filter(|r| filter.matches(r)).collect();
    let summary = ScoreSummary {
        count: selected.len(),
        mean_smart_pct: mean_percent(&selected, Metric::SmartScore),
        mean_sustainable_pct: mean_percent(&selected, Metric::SustainableScore),
    };
    DashboardView {
        filter,
        years,
        records: selected,
        invalid,
        summary,
    }
}

/// Summary statistics for one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricSummary {
    pub metric: Metric,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute per-column statistics over all records (valid or not).
pub fn field_summary(records: &[IndicatorRecord]) -> Vec<MetricSummary> {
    let mut out = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let mut vals: Vec<f64> = records
            .iter()
            .filter_map(|r| r.metric(metric))
            .filter(|v| !v.is_nan())
            .collect();
        vals.sort_by(|a, b| a.total_cmp(b));
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(MetricSummary {
            metric,
            count,
            missing: records.len() - count,
            min,
            max,
            mean,
            median,
        });
    }
    out
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
