//! In-memory snapshot source for testing.

use crate::collector::traits::{AcquireError, Snapshot, SnapshotSource};

/// Snapshot source returning canned rows, or a canned failure.
///
/// Simulates the listing utility without spawning anything, so tests run the
/// same on every platform.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    rows: Vec<String>,
    /// Exit status to report instead of returning rows.
    failure: Option<i32>,
}

impl MockSource {
    /// Creates a source with no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source from raw listing text.
    pub fn from_output(output: &str) -> Self {
        Self {
            rows: Snapshot::from_output(output).rows().to_vec(),
            failure: None,
        }
    }

    /// Creates a source whose listing utility always exits with `code`.
    pub fn failing(code: i32) -> Self {
        Self {
            rows: Vec::new(),
            failure: Some(code),
        }
    }

    /// Appends a raw row.
    pub fn add_row(&mut self, row: impl Into<String>) {
        self.rows.push(row.into());
    }

    /// Appends a row built from individual columns, laid out like `ps auxww`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_process(
        &mut self,
        user: &str,
        pid: u32,
        cpu: f64,
        mem: f64,
        vsz_kb: u64,
        rss_kb: u64,
        command: &str,
    ) {
        self.rows.push(format!(
            "{:<16} {:>6} {:>5.1} {:>4.1} {:>8} {:>6}   ??  S    9:00AM   0:00.10 {}",
            user, pid, cpu, mem, vsz_kb, rss_kb, command
        ));
    }
}

impl SnapshotSource for MockSource {
    fn fetch(&self) -> Result<Snapshot, AcquireError> {
        match self.failure {
            Some(code) => Err(AcquireError::ExitStatus {
                program: "ps".to_string(),
                code: Some(code),
            }),
            None => Ok(Snapshot::new(self.rows.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::parser::parse_ps_row;

    #[test]
    fn test_mock_source_add_process() {
        let mut source = MockSource::new();
        source.add_process("root", 112, 0.5, 0.1, 4096, 2048, "/usr/sbin/sshd -i");

        let snapshot = source.fetch().unwrap();
        assert_eq!(snapshot.len(), 1);

        let row = parse_ps_row(&snapshot.rows()[0]).unwrap();
        assert_eq!(row.cpu_percent, 0.5);
        assert_eq!(row.vsz_kb, 4096);
        assert!(snapshot.rows()[0].ends_with("/usr/sbin/sshd -i"));
    }

    #[test]
    fn test_mock_source_failing() {
        let source = MockSource::failing(1);
        assert!(matches!(
            source.fetch(),
            Err(AcquireError::ExitStatus { code: Some(1), .. })
        ));
    }
}
