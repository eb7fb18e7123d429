//! Status decision and column aggregation for matched rows.

use tracing::{debug, warn};

use crate::collector::parser::parse_ps_row;
use crate::metrics::{MetricKind, MetricRecord};

use super::matcher::WatchMatch;

const KB_PER_MB: f64 = 1024.0;

/// Resource totals across every instance of one watched process.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub vsz_kb: u64,
    pub rss_kb: u64,
}

impl Totals {
    /// Sums the resource columns of the given rows.
    ///
    /// Rows that fail to parse contribute nothing; they still counted toward
    /// the instance count when the status was decided.
    pub fn from_lines(lines: &[&str]) -> Self {
        let mut totals = Self::default();
        for line in lines {
            match parse_ps_row(line) {
                Ok(row) => {
                    totals.cpu_percent += row.cpu_percent;
                    totals.mem_percent += row.mem_percent;
                    totals.vsz_kb = totals.vsz_kb.saturating_add(row.vsz_kb);
                    totals.rss_kb = totals.rss_kb.saturating_add(row.rss_kb);
                }
                Err(e) => warn!(row = %line, "ignoring resource columns: {}", e),
            }
        }
        totals
    }

    /// Virtual size in MB.
    pub fn vsz_mb(&self) -> f64 {
        self.vsz_kb as f64 / KB_PER_MB
    }

    /// Resident size in MB.
    pub fn rss_mb(&self) -> f64 {
        self.rss_kb as f64 / KB_PER_MB
    }
}

/// Builds the metric records for one watch spec.
///
/// Down yields a single STATUS=0 record. Up yields STATUS=1 followed by
/// CPU_US, MEM_US, VM_MEM and PH_MEM, in that order.
pub fn aggregate(watch: &WatchMatch<'_>, object: &str) -> Vec<MetricRecord> {
    if !watch.is_up() {
        debug!(
            label = %watch.spec.label,
            expected = watch.spec.expected_count,
            found = watch.lines.len(),
            "process down"
        );
        return vec![MetricRecord::status(false, object)];
    }

    let totals = Totals::from_lines(&watch.lines);
    debug!(label = %watch.spec.label, instances = watch.lines.len(), ?totals, "process up");

    vec![
        MetricRecord::status(true, object),
        MetricRecord::amount(MetricKind::CpuUs, totals.cpu_percent, object),
        MetricRecord::amount(MetricKind::MemUs, totals.mem_percent, object),
        MetricRecord::amount(MetricKind::VmMem, totals.vsz_mb(), object),
        MetricRecord::amount(MetricKind::PhMem, totals.rss_mb(), object),
    ]
}
