//! Error types for the rainfall pipeline and the I/O boundary around it.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the pure processing core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    /// A raw row's date could not be read as a calendar day.
    #[error("unparseable date {raw:?}")]
    Parse { raw: String },

    /// Bounds were requested over a series with no entries.
    #[error("cannot compute bounds of an empty series")]
    EmptySeries,

    /// A month number outside 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth { month: u32 },
}

/// Errors raised by a data source in the fallback chain.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source file '{}' not found", .0.display())]
    Unavailable(PathBuf),

    #[error("failed to read '{}'", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse CSV '{}'", .0.display())]
    Csv(PathBuf, #[source] csv::Error),

    #[error("failed to parse JSON '{}'", .0.display())]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("'{}' holds no usable readings", .0.display())]
    Empty(PathBuf),

    #[error("all rainfall sources failed: {}", format_attempts(.0))]
    Exhausted(Vec<(String, SourceError)>),
}

fn format_attempts(attempts: &[(String, SourceError)]) -> String {
    if attempts.is_empty() {
        return "no sources configured".to_string();
    }
    attempts
        .iter()
        .map(|(name, err)| format!("{name}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised by the figure store.
#[derive(Debug, Error)]
pub enum FigureError {
    #[error("unknown figure '{0}'")]
    UnknownFigure(String),

    #[error("failed to read figure '{}'", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse figure '{}'", .0.display())]
    Json(PathBuf, #[source] serde_json::Error),
}

/// Errors raised while loading the TOML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}'", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config '{}'", .0.display())]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
