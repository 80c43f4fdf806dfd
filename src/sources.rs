//! Rainfall data providers and the ordered fallback chain over them.
//!
//! The pure pipeline never knows where rows come from. A provider turns its
//! backing file into a monthly series; the chain asks each provider in turn
//! and returns the first series it gets.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::SourceError;
use crate::figures::{figure_file, FULL_YEAR_FIGURE, MONSOON_FIGURE};
use crate::loader::{load_plotly_json, load_rainfall_csv, LoadReport};
use crate::types::{DailyReading, MonthlyAverage};

/// A monthly series together with where it came from.
#[derive(Debug, Clone, Default)]
pub struct SourcedSeries {
    pub source: String,
    pub monthly: Vec<MonthlyAverage>,
    /// Deduplicated daily readings, when the provider had them.
    pub daily: Vec<DailyReading>,
    pub report: Option<LoadReport>,
}

pub trait RainfallSource {
    fn name(&self) -> &str;

    /// Monthly series for the full year or, if `monsoon_only`, a series that
    /// at least covers the monsoon months.
    fn monthly_series(&self, monsoon_only: bool) -> Result<SourcedSeries, SourceError>;
}

/// Daily rain index CSV export, processed on every request.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RainfallSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn monthly_series(&self, _monsoon_only: bool) -> Result<SourcedSeries, SourceError> {
        let (series, report) = load_rainfall_csv(&self.path)?;
        if series.monthly.is_empty() {
            return Err(SourceError::Empty(self.path.clone()));
        }
        Ok(SourcedSeries {
            source: self.name().to_string(),
            monthly: series.monthly,
            daily: series.daily,
            report: Some(report),
        })
    }
}

/// Precomputed Plotly index figures in a results directory. The full-year
/// and monsoon views live in separate files.
#[derive(Debug, Clone)]
pub struct PlotlyJsonSource {
    dir: PathBuf,
}

impl PlotlyJsonSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn figure_path(&self, monsoon_only: bool) -> PathBuf {
        let key = if monsoon_only {
            MONSOON_FIGURE
        } else {
            FULL_YEAR_FIGURE
        };
        // Both keys are in the figure table.
        self.dir.join(figure_file(key).unwrap_or_default())
    }
}

impl RainfallSource for PlotlyJsonSource {
    fn name(&self) -> &str {
        "plotly-json"
    }

    fn monthly_series(&self, monsoon_only: bool) -> Result<SourcedSeries, SourceError> {
        let path = self.figure_path(monsoon_only);
        let monthly = load_plotly_json(&path)?;
        if monthly.is_empty() {
            return Err(SourceError::Empty(path));
        }
        Ok(SourcedSeries {
            source: self.name().to_string(),
            monthly,
            ..Default::default()
        })
    }
}

/// Providers tried in order until one yields a series.
#[derive(Default)]
pub struct SourceChain {
    sources: Vec<Box<dyn RainfallSource>>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The usual chain: the daily CSV export, then the precomputed figures.
    pub fn standard(csv_path: &Path, results_dir: &Path) -> Self {
        Self::new()
            .with(CsvSource::new(csv_path))
            .with(PlotlyJsonSource::new(results_dir))
    }

    pub fn with(mut self, source: impl RainfallSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn load(&self, monsoon_only: bool) -> Result<SourcedSeries, SourceError> {
        let mut attempts = Vec::new();
        for source in &self.sources {
            match source.monthly_series(monsoon_only) {
                Ok(series) => {
                    info!(
                        source = source.name(),
                        months = series.monthly.len(),
                        "rainfall series loaded"
                    );
                    return Ok(series);
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "rainfall source failed, trying next");
                    attempts.push((source.name().to_string(), e));
                }
            }
        }
        Err(SourceError::Exhausted(attempts))
    }
}
