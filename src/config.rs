//! Startup configuration built from the two positional inputs.

use std::fmt;

use crate::metrics::MetricTable;
use crate::watch::{WatchSpec, parse_watch_list};

/// Malformed metric-state or watch-list input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The mask does not have one flag per metric.
    MetricCount { expected: usize, got: usize },
    /// A mask token other than `0` or `1`.
    MetricFlag { metric: &'static str, value: String },
    /// A watch record without the `;` or `#` separator.
    MissingDelimiter { record: String, delimiter: char },
    /// A watch record whose path token is empty.
    EmptyPath { record: String },
    /// A watch record whose count is not a base-10 integer.
    InvalidCount { record: String, count: String },
    /// The process listing command line is empty.
    EmptyCommand,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MetricCount { expected, got } => write!(
                f,
                "invalid number of metric state: expected {}, got {}",
                expected, got
            ),
            ConfigError::MetricFlag { metric, value } => {
                write!(f, "invalid state '{}' for metric {}", value, metric)
            }
            ConfigError::MissingDelimiter { record, delimiter } => {
                write!(f, "missing '{}' in process record '{}'", delimiter, record)
            }
            ConfigError::EmptyPath { record } => {
                write!(f, "empty process path in record '{}'", record)
            }
            ConfigError::InvalidCount { record, count } => write!(
                f,
                "invalid instance count '{}' in process record '{}'",
                count, record
            ),
            ConfigError::EmptyCommand => write!(f, "empty process listing command"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which watch-spec field is printed as the object label of each record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ObjectLabel {
    /// The path token.
    #[default]
    Path,
    /// The label given before `;`.
    Name,
}

impl ObjectLabel {
    pub fn select<'a>(&self, spec: &'a WatchSpec) -> &'a str {
        match self {
            ObjectLabel::Path => &spec.path,
            ObjectLabel::Name => &spec.label,
        }
    }
}

/// Validated inputs for one invocation.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub metrics: MetricTable,
    pub watches: Vec<WatchSpec>,
}

impl MonitorConfig {
    /// Parses the metric mask and the watch list.
    ///
    /// The mask is checked first, so a bad mask is reported even when the
    /// watch list is malformed too.
    pub fn from_args(metric_state: &str, processes: &str) -> Result<Self, ConfigError> {
        let metrics = MetricTable::from_mask(metric_state)?;
        let watches = parse_watch_list(processes)?;
        Ok(Self { metrics, watches })
    }
}
