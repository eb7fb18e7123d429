//! Matching and aggregation of one process snapshot.
//!
//! Takes a snapshot from a [`SnapshotSource`], partitions its rows across the
//! watch specs and turns each partition into metric records. A watch spec that
//! does not have its expected number of instances is reported as down; that is
//! an ordinary result, not an error.

mod aggregate;
mod matcher;

pub use aggregate::{Totals, aggregate};
pub use matcher::{WatchMatch, match_rows};

use std::fmt;

use tracing::{debug, info};

use crate::collector::{AcquireError, Snapshot, SnapshotSource};
use crate::config::{ConfigError, ObjectLabel};
use crate::metrics::MetricRecord;
use crate::watch::WatchSpec;

/// Exit status for malformed input and unexpected failures.
pub const EXIT_CONFIGURATION: u8 = 1;
/// Exit status when the process listing cannot be obtained.
pub const EXIT_ACQUISITION: u8 = 30;

/// Fatal error of one invocation.
#[derive(Debug)]
pub enum MonitorError {
    /// Malformed metric state or watch list, detected before any snapshot.
    Configuration(ConfigError),
    /// The snapshot source failed.
    Acquisition(AcquireError),
}

impl MonitorError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            MonitorError::Configuration(_) => EXIT_CONFIGURATION,
            MonitorError::Acquisition(_) => EXIT_ACQUISITION,
        }
    }
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Configuration(e) => write!(f, "configuration error: {}", e),
            MonitorError::Acquisition(e) => write!(f, "unable to get process metrics: {}", e),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::Configuration(e) => Some(e),
            MonitorError::Acquisition(e) => Some(e),
        }
    }
}

impl From<ConfigError> for MonitorError {
    fn from(e: ConfigError) -> Self {
        MonitorError::Configuration(e)
    }
}

impl From<AcquireError> for MonitorError {
    fn from(e: AcquireError) -> Self {
        MonitorError::Acquisition(e)
    }
}

/// Evaluates every watch spec against one snapshot.
///
/// Pure: no I/O, records come out in watch-spec order.
pub fn evaluate(
    snapshot: &Snapshot,
    watches: &[WatchSpec],
    self_name: Option<&str>,
    object_label: ObjectLabel,
) -> Vec<MetricRecord> {
    match_rows(snapshot.rows(), watches, self_name)
        .iter()
        .flat_map(|watch| aggregate(watch, object_label.select(watch.spec)))
        .collect()
}

/// Takes one snapshot and evaluates the watch list against it.
pub struct Monitor<S: SnapshotSource> {
    source: S,
    self_name: Option<String>,
    object_label: ObjectLabel,
}

impl<S: SnapshotSource> Monitor<S> {
    /// Creates a monitor without self exclusion.
    pub fn new(source: S) -> Self {
        Self {
            source,
            self_name: None,
            object_label: ObjectLabel::default(),
        }
    }

    /// Sets the program name whose rows are never matched. Empty disables it.
    pub fn with_self_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.self_name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn with_object_label(mut self, object_label: ObjectLabel) -> Self {
        self.object_label = object_label;
        self
    }

    pub fn self_name(&self) -> Option<&str> {
        self.self_name.as_deref()
    }

    /// Fetches a snapshot and builds the records for `watches`.
    ///
    /// Acquisition failure is returned before any record is built, so callers
    /// never see partial output.
    pub fn collect(&self, watches: &[WatchSpec]) -> Result<Vec<MetricRecord>, MonitorError> {
        let snapshot = self.source.fetch()?;
        info!(
            rows = snapshot.len(),
            watches = watches.len(),
            "process snapshot taken"
        );

        let records = evaluate(
            &snapshot,
            watches,
            self.self_name.as_deref(),
            self.object_label,
        );
        debug!(records = records.len(), "evaluation finished");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::{MockSource, SELF_NAME};
    use crate::metrics::{MetricKind, MetricValue};
    use crate::watch::parse_watch_list;

    fn watches() -> Vec<WatchSpec> {
        parse_watch_list(
            "ssh service;/usr/sbin/sshd#1,node service;/usr/local/bin/node#3,web;nginx#3",
        )
        .unwrap()
    }

    #[test]
    fn test_collect_typical_system() {
        let monitor = Monitor::new(MockSource::typical_system()).with_self_name(SELF_NAME);
        let records = monitor.collect(&watches()).unwrap();

        // sshd and node are up (5 records each), nginx has 2 of 3 (1 record)
        assert_eq!(records.len(), 11);

        let lines: Vec<String> = records.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "27:Status:9|1|/usr/sbin/sshd",
                "53:% Proc CPU Utilization:6|0.00|/usr/sbin/sshd",
                "92:% Proc Memory Utilization:6|0.10|/usr/sbin/sshd",
                "94:Proc Virtual Memory:4|4204.33|/usr/sbin/sshd",
                "18:Proc Physical Memory:4|6.00|/usr/sbin/sshd",
                "27:Status:9|1|/usr/local/bin/node",
                "53:% Proc CPU Utilization:6|4.00|/usr/local/bin/node",
                "92:% Proc Memory Utilization:6|2.30|/usr/local/bin/node",
                "94:Proc Virtual Memory:4|600.00|/usr/local/bin/node",
                "18:Proc Physical Memory:4|192.00|/usr/local/bin/node",
                "27:Status:9|0|nginx",
            ]
        );
    }

    #[test]
    fn test_collect_without_self_exclusion_counts_monitor() {
        let monitor = Monitor::new(MockSource::typical_system());
        let records = monitor.collect(&watches()).unwrap();

        // The monitor's own row adds a fourth node and a second sshd
        let statuses: Vec<_> = records
            .iter()
            .filter(|r| r.kind == MetricKind::Status)
            .map(|r| r.value)
            .collect();
        assert_eq!(statuses, vec![MetricValue::Status(false); 3]);
    }

    #[test]
    fn test_object_label_name() {
        let monitor = Monitor::new(MockSource::typical_system())
            .with_self_name(SELF_NAME)
            .with_object_label(ObjectLabel::Name);
        let records = monitor.collect(&watches()).unwrap();
        assert_eq!(records[0].object, "ssh service");
        assert_eq!(records.last().unwrap().object, "web");
    }

    #[test]
    fn test_acquisition_error() {
        let monitor = Monitor::new(MockSource::failing(1)).with_self_name(SELF_NAME);
        let err = monitor.collect(&watches()).unwrap_err();

        assert!(matches!(err, MonitorError::Acquisition(_)));
        assert_eq!(err.exit_code(), EXIT_ACQUISITION);
    }

    #[test]
    fn test_configuration_exit_code() {
        let err = MonitorError::from(ConfigError::MetricCount {
            expected: 5,
            got: 4,
        });
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_empty_self_name_disables_exclusion() {
        let monitor = Monitor::new(MockSource::new()).with_self_name("");
        assert_eq!(monitor.self_name(), None);
    }

    #[test]
    fn test_header_only_all_down() {
        let snapshot = MockSource::header_only().fetch().unwrap();
        let records = evaluate(&snapshot, &watches(), Some(SELF_NAME), ObjectLabel::Path);
        assert_eq!(records.len(), 3);
        assert!(
            records
                .iter()
                .all(|r| r.value == MetricValue::Status(false))
        );
    }

    #[test]
    fn test_malformed_rows_scenario() {
        let snapshot = MockSource::with_malformed_rows().fetch().unwrap();
        let watches = parse_watch_list("broken;/usr/local/bin/broken#2,stub;daemon 700#1").unwrap();
        let records = evaluate(&snapshot, &watches, Some(SELF_NAME), ObjectLabel::Path);

        assert_eq!(records[0].value, MetricValue::Status(true));
        assert_eq!(records[1].value.to_string(), "1.00");
        // The truncated row matches but has no columns to add
        assert_eq!(records[5].value, MetricValue::Status(true));
        assert_eq!(records[6].value.to_string(), "0.00");
    }
}
