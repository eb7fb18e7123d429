//! Line-oriented output of metric records.
//!
//! Each enabled record becomes one `<metricId>|<value>|<objectLabel>` line.
//! Records whose metric is disabled in the mask are dropped silently.

use std::io::{self, Write};

use crate::metrics::{MetricRecord, MetricTable};

/// Writes records that pass the metric mask.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Writes every enabled record and flushes. Returns the number of lines.
    pub fn write_records(
        &mut self,
        records: &[MetricRecord],
        metrics: &MetricTable,
    ) -> io::Result<usize> {
        let mut written = 0;
        for record in records.iter().filter(|r| metrics.is_enabled(r.kind)) {
            writeln!(self.out, "{}", record)?;
            written += 1;
        }
        self.out.flush()?;
        Ok(written)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Renders the enabled records as output lines.
pub fn render(records: &[MetricRecord], metrics: &MetricTable) -> Vec<String> {
    records
        .iter()
        .filter(|r| metrics.is_enabled(r.kind))
        .map(MetricRecord::to_string)
        .collect()
}
