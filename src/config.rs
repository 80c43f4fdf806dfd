use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::SeriesBounds;

pub const DEFAULT_CONFIG_FILE: &str = "monsoon.toml";

/// Top-level configuration, read from `monsoon.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// Daily rain index export.
    #[serde(default = "default_rainfall_csv")]
    pub rainfall_csv: PathBuf,
    /// Directory holding the precomputed Plotly figures.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(default = "default_figure_capacity")]
    pub figure_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Bounds used for the color scale when the series is empty.
    #[serde(default = "default_fallback_min")]
    pub fallback_min: f64,
    #[serde(default = "default_fallback_max")]
    pub fallback_max: f64,
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_rainfall_csv() -> PathBuf {
    PathBuf::from("src/data/complete_data_INDIAN_RAIN_INDEX_Historical_Data.csv")
}
fn default_results_dir() -> PathBuf {
    PathBuf::from("src/data/results")
}
fn default_figure_capacity() -> usize {
    8
}
fn default_fallback_min() -> f64 {
    -100.0
}
fn default_fallback_max() -> f64 {
    100.0
}
fn default_preview_rows() -> usize {
    12
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            rainfall_csv: default_rainfall_csv(),
            results_dir: default_results_dir(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            figure_capacity: default_figure_capacity(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fallback_min: default_fallback_min(),
            fallback_max: default_fallback_max(),
            preview_rows: default_preview_rows(),
        }
    }
}

impl DisplayConfig {
    pub fn fallback_bounds(&self) -> SeriesBounds {
        SeriesBounds {
            min: self.fallback_min,
            max: self.fallback_max,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(text).map_err(|e| ConfigError::Toml(origin.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&text, path)
    }

    /// Load `path` if given. Without one, the default file is read when it
    /// exists and built-in defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.figure_capacity == 0 {
            return Err(ConfigError::Invalid(
                "cache.figure_capacity must be at least 1".to_string(),
            ));
        }
        let d = &self.display;
        if !(d.fallback_min.is_finite() && d.fallback_max.is_finite()) {
            return Err(ConfigError::Invalid(
                "display fallback bounds must be finite".to_string(),
            ));
        }
        if d.fallback_min > d.fallback_max {
            return Err(ConfigError::Invalid(format!(
                "display.fallback_min ({}) is above display.fallback_max ({})",
                d.fallback_min, d.fallback_max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        Config::from_toml_str(text, Path::new("test.toml"))
    }

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse(
            r#"
            [data]
            results_dir = "out/results"

            [cache]
            figure_capacity = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.data.results_dir, PathBuf::from("out/results"));
        assert_eq!(config.data.rainfall_csv, default_rainfall_csv());
        assert_eq!(config.cache.figure_capacity, 3);
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            parse("[cache]\nsize = 3\n"),
            Err(ConfigError::Toml(..))
        ));
    }

    #[test]
    fn zero_capacity_is_invalid() {
        assert!(matches!(
            parse("[cache]\nfigure_capacity = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn inverted_fallback_bounds_are_invalid() {
        let err = parse("[display]\nfallback_min = 5.0\nfallback_max = -5.0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid config: display.fallback_min (5) is above display.fallback_max (-5)"
        );
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monsoon.toml");
        std::fs::write(&path, "[display]\npreview_rows = 4\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.display.preview_rows, 4);
        assert_eq!(
            config.display.fallback_bounds(),
            SeriesBounds { min: -100.0, max: 100.0 }
        );
    }
}
