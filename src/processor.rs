//! The rainfall series pipeline.
//!
//! Raw rows are normalized into daily readings, collapsed to one reading per
//! calendar day, and averaged per (year, month). Every function here is pure:
//! no I/O, no shared state, safe to call from any thread.

use std::collections::BTreeMap;

use chrono::Datelike;
use tracing::debug;

use crate::error::ProcessError;
use crate::types::{
    DailyReading, MonthlyAverage, ProcessedSeries, RainfallPayload, RawReading, SeriesBounds,
};
use crate::util::{parse_date_safe, parse_f64_safe, parse_i32_safe, parse_month_safe};

/// June through September.
pub const MONSOON_MONTHS: [u32; 4] = [6, 7, 8, 9];

/// Outcome of [`normalize`]: the readings that parsed plus the number of
/// rows dropped for an unreadable date.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub readings: Vec<DailyReading>,
    pub skipped: usize,
}

/// Normalize one raw row.
///
/// An unreadable date is an error. An unreadable value is not: it becomes
/// NaN so the day still counts for deduplication.
pub fn normalize_row(row: &RawReading) -> Result<DailyReading, ProcessError> {
    let date = parse_date_safe(Some(&row.date)).ok_or_else(|| ProcessError::Parse {
        raw: row.date.clone(),
    })?;
    let index_value = parse_f64_safe(row.index_value.as_deref()).unwrap_or(f64::NAN);
    let year = parse_i32_safe(row.year.as_deref()).unwrap_or_else(|| date.year());
    let month = parse_month_safe(row.month.as_deref()).unwrap_or_else(|| date.month());
    Ok(DailyReading {
        date,
        index_value,
        year,
        month,
    })
}

pub fn normalize(rows: &[RawReading]) -> Normalized {
    let mut out = Normalized::default();
    for row in rows {
        match normalize_row(row) {
            Ok(r) => out.readings.push(r),
            Err(e) => {
                debug!(error = %e, "skipping raw row");
                out.skipped += 1;
            }
        }
    }
    out
}

/// Keep one reading per calendar day, ascending by date.
///
/// A numeric value replaces whatever was kept before it for that day, so the
/// last numeric reading in input order wins. A NaN reading never replaces an
/// earlier one.
pub fn dedupe(readings: &[DailyReading]) -> Vec<DailyReading> {
    let mut sorted = readings.to_vec();
    // `sort_by_key` is stable, so same-day readings keep their input order.
    sorted.sort_by_key(|r| r.date);

    let mut out: Vec<DailyReading> = Vec::with_capacity(sorted.len());
    for r in sorted {
        match out.last_mut() {
            Some(kept) if kept.date == r.date => {
                if r.is_valid() {
                    *kept = r;
                }
            }
            _ => out.push(r),
        }
    }
    out
}

/// Mean of the valid readings in each (year, month) bucket.
///
/// Buckets without a single valid reading are left out. The result happens
/// to be ordered by (year, month), but callers that display it should not
/// rely on that and sort for themselves.
pub fn aggregate_monthly(readings: &[DailyReading]) -> Vec<MonthlyAverage> {
    let mut buckets: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for r in readings.iter().filter(|r| r.is_valid()) {
        buckets.entry((r.year, r.month)).or_default().push(r.index_value);
    }
    buckets
        .into_iter()
        .map(|((year, month), values)| MonthlyAverage {
            year,
            month,
            index_value: mean(&values),
        })
        .collect()
}

/// Mean of finite values that stays finite even when their sum would not.
fn mean(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        sum / n
    } else {
        values.iter().map(|v| v / n).sum()
    }
}

pub fn filter_monsoon_months(monthly: &[MonthlyAverage]) -> Vec<MonthlyAverage> {
    monthly
        .iter()
        .filter(|m| MONSOON_MONTHS.contains(&m.month))
        .copied()
        .collect()
}

pub fn compute_bounds(monthly: &[MonthlyAverage]) -> Result<SeriesBounds, ProcessError> {
    let first = monthly.first().ok_or(ProcessError::EmptySeries)?;
    let init = SeriesBounds {
        min: first.index_value,
        max: first.index_value,
    };
    Ok(monthly.iter().fold(init, |b, m| SeriesBounds {
        min: b.min.min(m.index_value),
        max: b.max.max(m.index_value),
    }))
}

/// Run normalize, dedupe and aggregate over one batch of raw rows.
pub fn process(rows: &[RawReading]) -> ProcessedSeries {
    let normalized = normalize(rows);
    let daily = dedupe(&normalized.readings);
    let mut monthly = aggregate_monthly(&daily);
    sort_monthly(&mut monthly);
    debug!(
        raw = rows.len(),
        skipped = normalized.skipped,
        daily = daily.len(),
        monthly = monthly.len(),
        "processed rainfall rows"
    );
    ProcessedSeries {
        daily,
        monthly,
        skipped: normalized.skipped,
    }
}

pub fn sort_monthly(monthly: &mut [MonthlyAverage]) {
    monthly.sort_by_key(|m| (m.year, m.month));
}

/// Group a monthly series by year, each year's entries ordered by month.
pub fn group_by_year(monthly: &[MonthlyAverage]) -> BTreeMap<i32, Vec<MonthlyAverage>> {
    let mut grouped: BTreeMap<i32, Vec<MonthlyAverage>> = BTreeMap::new();
    for m in monthly {
        grouped.entry(m.year).or_default().push(*m);
    }
    for entries in grouped.values_mut() {
        entries.sort_by_key(|m| m.month);
    }
    grouped
}

/// Build the chart payload for a monthly series, optionally restricted to
/// the monsoon months. Fails on an empty series.
pub fn build_payload(
    monthly: &[MonthlyAverage],
    monsoon_only: bool,
) -> Result<RainfallPayload, ProcessError> {
    let selected = select(monthly, monsoon_only);
    let bounds = compute_bounds(&selected)?;
    Ok(assemble(&selected, bounds, monsoon_only))
}

/// Like [`build_payload`], but an empty series gets `fallback` bounds.
pub fn build_payload_or(
    monthly: &[MonthlyAverage],
    monsoon_only: bool,
    fallback: SeriesBounds,
) -> RainfallPayload {
    let selected = select(monthly, monsoon_only);
    let bounds = compute_bounds(&selected).unwrap_or(fallback);
    assemble(&selected, bounds, monsoon_only)
}

fn select(monthly: &[MonthlyAverage], monsoon_only: bool) -> Vec<MonthlyAverage> {
    if monsoon_only {
        filter_monsoon_months(monthly)
    } else {
        monthly.to_vec()
    }
}

fn assemble(selected: &[MonthlyAverage], bounds: SeriesBounds, monsoon_only: bool) -> RainfallPayload {
    RainfallPayload {
        yearly_data: group_by_year(selected),
        min_value: bounds.min,
        max_value: bounds.max,
        is_monsoon_only: monsoon_only,
    }
}
