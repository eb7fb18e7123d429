//! Pre-built listings for testing.
//!
//! The rows mimic `ps auxww` output on macOS, including the monitor's own
//! invocation and the `ps` process it spawned.

use super::source::MockSource;

/// Program name of the monitor as it appears in the canned listings.
pub const SELF_NAME: &str = "procwatch";

const TYPICAL_LISTING: &str = "\
USER               PID  %CPU %MEM      VSZ    RSS   TT  STAT STARTED      TIME COMMAND
root                 1   0.1  0.2  4330612  13456   ??  Ss   Mon09AM   3:12.45 /sbin/launchd
root               112   0.0  0.1  4305232   6144   ??  Ss   Mon09AM   0:00.12 /usr/sbin/sshd -i
app                501   1.5  0.8   102400  65536   ??  S    Mon09AM   1:02.10 /usr/local/bin/node /srv/api/server.js
app                502   2.5  1.2   204800  98304   ??  S    Mon09AM   2:11.00 /usr/local/bin/node /srv/api/worker.js
app                503   0.0  0.3   307200  32768   ??  S    Mon09AM   0:05.33 /usr/local/bin/node /srv/api/cron.js
_www               640   0.3  0.4   409600  20480   ??  Ss   Mon09AM   0:20.01 nginx: master process /usr/local/sbin/nginx
_www               641   0.2  0.4   409600  20480   ??  S    Mon09AM   0:10.50 nginx: worker process
monitor            900   0.0  0.0  4268000   2048 s000  S+   10:15AM   0:00.01 /opt/monitor/bin/procwatch 1,1,1,1,1 ssh service;/usr/sbin/sshd#1,node service;/usr/local/bin/node#3
root               901   0.0  0.0  4267000   1024 s000  R+   10:15AM   0:00.00 ps auxww
";

impl MockSource {
    /// A typical host: launchd, one sshd, three node instances, an nginx
    /// master with one worker, the monitor itself and the `ps` it spawned.
    pub fn typical_system() -> Self {
        Self::from_output(TYPICAL_LISTING)
    }

    /// Only the header row, as on a host where nothing else is visible.
    pub fn header_only() -> Self {
        Self::from_output(
            "USER               PID  %CPU %MEM      VSZ    RSS   TT  STAT STARTED      TIME COMMAND\n",
        )
    }

    /// A listing with a truncated row and a row with garbage in the numeric
    /// columns, both belonging to `/usr/local/bin/broken`.
    pub fn with_malformed_rows() -> Self {
        let mut source = Self::header_only();
        source.add_row("daemon 700 0.5");
        source.add_row(
            "daemon 701 n/a 0.5 2048 1024 ?? S Mon09AM 0:00.01 /usr/local/bin/broken --serve",
        );
        source.add_process("daemon", 702, 1.0, 0.5, 2048, 1024, "/usr/local/bin/broken --worker");
        source
    }
}

#[cfg(test)]
mod tests {
    use crate::collector::parser::parse_ps_row;
    use crate::collector::traits::SnapshotSource;

    use super::*;

    #[test]
    fn test_typical_system_rows_parse() {
        let snapshot = MockSource::typical_system().fetch().unwrap();
        assert_eq!(snapshot.len(), 10);

        // Everything except the header has the full column layout
        for row in &snapshot.rows()[1..] {
            assert!(parse_ps_row(row).is_ok(), "row failed to parse: {}", row);
        }
    }

    #[test]
    fn test_self_row_present() {
        let snapshot = MockSource::typical_system().fetch().unwrap();
        let self_rows = snapshot
            .rows()
            .iter()
            .filter(|r| r.contains(SELF_NAME))
            .count();
        assert_eq!(self_rows, 1);
    }
}
