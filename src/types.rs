use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One untrusted row of the historical rain index export.
///
/// Only `Date` and `Index Value` are required columns; `Year` and `Month`
/// are derived from the date when missing or not numeric.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReading {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Index Value")]
    pub index_value: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Month", default)]
    pub month: Option<String>,
}

impl RawReading {
    pub fn new(date: impl Into<String>, index_value: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            index_value: Some(index_value.into()),
            year: None,
            month: None,
        }
    }
}

/// A normalized daily reading. `index_value` is NaN when the source cell
/// was empty or not numeric.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DailyReading {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Index Value")]
    pub index_value: f64,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
}

impl DailyReading {
    pub fn is_valid(&self) -> bool {
        !self.index_value.is_nan()
    }
}

// NaN compares equal to NaN here so that whole series can be compared in tests.
impl PartialEq for DailyReading {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
            && self.year == other.year
            && self.month == other.month
            && (self.index_value == other.index_value
                || (self.index_value.is_nan() && other.index_value.is_nan()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyAverage {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "Index Value")]
    pub index_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesBounds {
    pub min: f64,
    pub max: f64,
}

/// Result of running the pipeline over a batch of raw rows.
#[derive(Debug, Clone, Default)]
pub struct ProcessedSeries {
    /// One reading per calendar day, ascending by date.
    pub daily: Vec<DailyReading>,
    /// Monthly averages ordered by (year, month).
    pub monthly: Vec<MonthlyAverage>,
    /// Rows dropped because their date could not be parsed.
    pub skipped: usize,
}

/// The shape handed to chart components.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RainfallPayload {
    pub yearly_data: BTreeMap<i32, Vec<MonthlyAverage>>,
    pub min_value: f64,
    pub max_value: f64,
    pub is_monsoon_only: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Success { success: bool, data: T },
    Failure { success: bool, error: String },
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse::Success {
            success: true,
            data,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        ApiResponse::Failure {
            success: false,
            error: error.into(),
        }
    }
}

/// Console preview row for a monthly average.
#[derive(Debug, Clone, Tabled)]
pub struct MonthlyPreviewRow {
    #[tabled(rename = "Year")]
    pub year: i32,
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "IndexValue")]
    pub index_value: String,
    #[tabled(rename = "Color")]
    pub color: String,
}

#[derive(Debug, Clone, Tabled)]
pub struct FigureRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "File")]
    pub file: String,
}

#[derive(Debug, Clone, Tabled)]
pub struct MonthNameRow {
    #[tabled(rename = "Number")]
    pub number: u32,
    #[tabled(rename = "Name")]
    pub name: String,
}
