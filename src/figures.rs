//! Precomputed forecast figures (Plotly JSON) served by short key.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::debug;

use crate::cache::LruCache;
use crate::error::FigureError;

pub const FULL_YEAR_FIGURE: &str = "fig1";
pub const MONSOON_FIGURE: &str = "fig2";

static FIGURE_FILES: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("fig1", "fig_1_comic_neue_index_by_year_color_bars.json"),
        ("fig2", "fig_2_comic_neue_index_by_year_color_bars.json"),
        ("fig3", "fig_3_xgboost_forecast_2024_evaluation_comic_neue.json"),
        ("fig4", "fig_4_xgboost_monsoon_forecast_2024_evaluation_comic_neue.json"),
        ("fig5", "fig_5_2025_daily_forecast_comic_neue.json"),
        ("fig55", "fig_55_2025_actual_vs_forecast_comic_neue.json"),
        ("fig6", "fig_6_2025_monthly_forecast_comic_neue.json"),
    ])
});

/// File name behind a figure key, if the key is known.
pub fn figure_file(key: &str) -> Option<&'static str> {
    FIGURE_FILES.get(key).copied()
}

/// All known keys with their file names, ordered by key.
pub fn figure_keys() -> impl Iterator<Item = (&'static str, &'static str)> {
    FIGURE_FILES.iter().map(|(k, v)| (*k, *v))
}

pub fn read_json(path: &Path) -> Result<Value, FigureError> {
    let text = std::fs::read_to_string(path).map_err(|e| FigureError::Io(path.to_path_buf(), e))?;
    serde_json::from_str(&text).map_err(|e| FigureError::Json(path.to_path_buf(), e))
}

/// Loads figures from a results directory and keeps the most recently used
/// ones parsed in memory.
#[derive(Debug)]
pub struct FigureStore {
    dir: PathBuf,
    cache: LruCache<String, Arc<Value>>,
}

impl FigureStore {
    pub fn new(dir: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            dir: dir.into(),
            cache: LruCache::new(capacity),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn get(&mut self, key: &str) -> Result<Arc<Value>, FigureError> {
        let file = figure_file(key).ok_or_else(|| FigureError::UnknownFigure(key.to_string()))?;
        if let Some(v) = self.cache.get(&key.to_string()) {
            debug!(key, "figure cache hit");
            return Ok(Arc::clone(v));
        }
        let value = Arc::new(read_json(&self.dir.join(file))?);
        if let Some((evicted, _)) = self.cache.put(key.to_string(), Arc::clone(&value)) {
            debug!(key, evicted = %evicted, "figure cache full, evicted oldest");
        }
        Ok(value)
    }
}
