use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::SourceError;
use crate::processor::process;
use crate::types::{MonthlyAverage, ProcessedSeries, RawReading};
use crate::util::{parse_f64_safe, parse_month_safe};

/// Traces each year contributes to the precomputed index figures.
pub const PLOTLY_TRACES_PER_YEAR: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    /// Rows the CSV reader could not map onto the row schema.
    pub rejected_rows: usize,
    /// Rows dropped for an unreadable date.
    pub skipped_dates: usize,
    /// Days kept after deduplication whose value is not numeric.
    pub nan_values: usize,
    pub daily_rows: usize,
    pub monthly_rows: usize,
}

/// Read the raw rows of a rain index CSV export.
///
/// Returns the rows that fit the schema and the number that did not. A row
/// whose field count differs from the header's is rejected, as is one that
/// fails to decode.
pub fn read_raw_csv(path: &Path) -> Result<(Vec<RawReading>, usize), SourceError> {
    if !path.exists() {
        return Err(SourceError::Unavailable(path.to_path_buf()));
    }
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| SourceError::Csv(path.to_path_buf(), e))?;
    // Fail early on an unreadable header instead of rejecting every row.
    let headers = rdr
        .headers()
        .map_err(|e| SourceError::Csv(path.to_path_buf(), e))?
        .clone();

    let mut rows = Vec::new();
    let mut rejected = 0usize;
    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "rejecting CSV row");
                rejected += 1;
                continue;
            }
        };
        if record.len() != headers.len() {
            debug!(
                line = record.position().map(|p| p.line()),
                fields = record.len(),
                expected = headers.len(),
                "rejecting CSV row with wrong field count"
            );
            rejected += 1;
            continue;
        }
        match record.deserialize::<RawReading>(Some(&headers)) {
            Ok(r) => rows.push(r),
            Err(e) => {
                debug!(error = %e, "rejecting CSV row");
                rejected += 1;
            }
        }
    }
    Ok((rows, rejected))
}

/// Read a rain index CSV and run it through the pipeline.
pub fn load_rainfall_csv(path: &Path) -> Result<(ProcessedSeries, LoadReport), SourceError> {
    let (rows, rejected_rows) = read_raw_csv(path)?;
    let series = process(&rows);
    let report = LoadReport {
        total_rows: rows.len() + rejected_rows,
        rejected_rows,
        skipped_dates: series.skipped,
        nan_values: series.daily.iter().filter(|r| !r.is_valid()).count(),
        daily_rows: series.daily.len(),
        monthly_rows: series.monthly.len(),
    };
    info!(
        path = %path.display(),
        total = report.total_rows,
        rejected = report.rejected_rows,
        skipped = report.skipped_dates,
        daily = report.daily_rows,
        monthly = report.monthly_rows,
        "loaded rainfall CSV"
    );
    Ok((series, report))
}

/// First `Year NNNN` in an annotation text.
fn year_in_annotation(text: &str) -> Option<i32> {
    text.match_indices("Year ").find_map(|(i, m)| {
        let digits = text.get(i + m.len()..i + m.len() + 4)?;
        if digits.chars().all(|c| c.is_ascii_digit()) {
            digits.parse().ok()
        } else {
            None
        }
    })
}

fn month_of(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .and_then(|m| u32::try_from(m).ok())
            .filter(|m| (1..=12).contains(m)),
        Value::String(s) => parse_month_safe(Some(s)),
        _ => None,
    }
}

fn value_of(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_f64_safe(Some(s)),
        _ => None,
    }
}

/// Recover monthly averages from a precomputed Plotly index figure.
///
/// Years come from the `Year NNNN` layout annotations in order; trace `i`
/// belongs to the `i / 5`-th year. Points without a usable month or value
/// are dropped.
pub fn monthly_from_plotly(figure: &Value) -> Vec<MonthlyAverage> {
    let years: Vec<i32> = figure["layout"]["annotations"]
        .as_array()
        .map(|annos| {
            annos
                .iter()
                .filter_map(|a| a["text"].as_str().and_then(year_in_annotation))
                .collect()
        })
        .unwrap_or_default();

    let mut out = Vec::new();
    let Some(traces) = figure["data"].as_array() else {
        return out;
    };
    for (i, trace) in traces.iter().enumerate() {
        let (Some(xs), Some(ys)) = (trace["x"].as_array(), trace["y"].as_array()) else {
            continue;
        };
        let Some(&year) = years.get(i / PLOTLY_TRACES_PER_YEAR) else {
            continue;
        };
        for (x, y) in xs.iter().zip(ys) {
            if let (Some(month), Some(index_value)) = (month_of(x), value_of(y)) {
                out.push(MonthlyAverage {
                    year,
                    month,
                    index_value,
                });
            }
        }
    }
    out
}

/// Read a Plotly figure file and recover its monthly series.
pub fn load_plotly_json(path: &Path) -> Result<Vec<MonthlyAverage>, SourceError> {
    if !path.exists() {
        return Err(SourceError::Unavailable(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|e| SourceError::Io(path.to_path_buf(), e))?;
    let figure: Value =
        serde_json::from_str(&text).map_err(|e| SourceError::Json(path.to_path_buf(), e))?;
    let monthly = monthly_from_plotly(&figure);
    info!(path = %path.display(), points = monthly.len(), "loaded plotly figure");
    Ok(monthly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_year_in_annotation() {
        assert_eq!(year_in_annotation("Year 2019"), Some(2019));
        assert_eq!(year_in_annotation("<b>Year 2021</b> (monsoon)"), Some(2021));
        assert_eq!(year_in_annotation("Year ab Year 2003"), Some(2003));
        assert_eq!(year_in_annotation("Year 20"), None);
        assert_eq!(year_in_annotation("Index"), None);
    }

    #[test]
    fn plotly_traces_map_to_years_in_blocks_of_five() {
        let mut data: Vec<Value> = (0..10)
            .map(|_| json!({ "type": "bar" }))
            .collect();
        data[0] = json!({ "x": [6, 7], "y": [1.5, -2.0] });
        data[5] = json!({ "x": ["8"], "y": [3.0] });
        let figure = json!({
            "data": data,
            "layout": { "annotations": [
                { "text": "Year 2020" },
                { "text": "legend" },
                { "text": "Year 2021" }
            ]}
        });
        let monthly = monthly_from_plotly(&figure);
        assert_eq!(
            monthly,
            vec![
                MonthlyAverage { year: 2020, month: 6, index_value: 1.5 },
                MonthlyAverage { year: 2020, month: 7, index_value: -2.0 },
                MonthlyAverage { year: 2021, month: 8, index_value: 3.0 },
            ]
        );
    }

    #[test]
    fn plotly_drops_unusable_points() {
        let figure = json!({
            "data": [{ "x": [6, 13, "x", 9], "y": [1.0, 2.0, 3.0, null] }],
            "layout": { "annotations": [{ "text": "Year 2022" }] }
        });
        assert_eq!(
            monthly_from_plotly(&figure),
            vec![MonthlyAverage { year: 2022, month: 6, index_value: 1.0 }]
        );
    }

    #[test]
    fn plotly_without_years_yields_nothing() {
        let figure = json!({ "data": [{ "x": [6], "y": [1.0] }], "layout": {} });
        assert!(monthly_from_plotly(&figure).is_empty());
        assert!(monthly_from_plotly(&json!({})).is_empty());
    }
}
