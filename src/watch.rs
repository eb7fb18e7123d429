//! Watch specifications: which processes to look for and how many of each.
//!
//! The watch list is one string of comma-separated records, each
//! `label;path#count`. For example:
//!
//! ```text
//! ssh service;/usr/sbin/sshd#1,node service;/usr/local/bin/node#3
//! ```

use crate::config::ConfigError;

/// One process the caller wants monitored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSpec {
    /// Free-form display label.
    pub label: String,
    /// Substring identifying matching rows of the process listing.
    pub path: String,
    /// Number of instances that must be running. Zero or negative values
    /// are accepted and can never be satisfied.
    pub expected_count: i64,
}

impl WatchSpec {
    pub fn new(label: impl Into<String>, path: impl Into<String>, expected_count: i64) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            expected_count,
        }
    }

    /// Returns true if a listing row mentions this spec's path token.
    pub fn matches(&self, row: &str) -> bool {
        row.contains(self.path.as_str())
    }
}

/// Parses a single `label;path#count` record.
pub fn parse_watch_spec(record: &str) -> Result<WatchSpec, ConfigError> {
    let mut parts = record.split(';');
    let label = parts.next().unwrap_or_default();
    let target = parts.next().ok_or_else(|| ConfigError::MissingDelimiter {
        record: record.to_string(),
        delimiter: ';',
    })?;

    let mut target_parts = target.split('#');
    let path = target_parts.next().unwrap_or_default();
    let count = target_parts
        .next()
        .ok_or_else(|| ConfigError::MissingDelimiter {
            record: record.to_string(),
            delimiter: '#',
        })?;

    if path.is_empty() {
        return Err(ConfigError::EmptyPath {
            record: record.to_string(),
        });
    }

    let expected_count = count
        .trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidCount {
            record: record.to_string(),
            count: count.to_string(),
        })?;

    Ok(WatchSpec::new(label, path, expected_count))
}

/// Parses the full comma-separated watch list, preserving order.
pub fn parse_watch_list(input: &str) -> Result<Vec<WatchSpec>, ConfigError> {
    input.split(',').map(parse_watch_spec).collect()
}
