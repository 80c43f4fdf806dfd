//! Monthly rainfall index series for the monsoon dashboard.
//!
//! [`processor`] holds the pure pipeline (normalize, dedupe, monthly
//! averages, monsoon filter, bounds); [`color`] maps a value onto the
//! diverging bar scale. Reading files, falling back between sources and
//! caching figures all happen at the edges in [`loader`], [`sources`] and
//! [`figures`].

pub mod cache;
pub mod color;
pub mod config;
pub mod error;
pub mod figures;
pub mod loader;
pub mod output;
pub mod processor;
pub mod sources;
pub mod types;
pub mod util;

pub use color::{color_for, BarColor};
pub use error::{ConfigError, FigureError, ProcessError, SourceError};
pub use processor::{
    aggregate_monthly, build_payload, compute_bounds, dedupe, filter_monsoon_months, normalize,
    process,
};
pub use types::{DailyReading, MonthlyAverage, RainfallPayload, RawReading, SeriesBounds};
pub use util::month_name;
