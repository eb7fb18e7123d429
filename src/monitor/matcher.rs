//! Partitions listing rows across watch specs.

use tracing::trace;

use crate::watch::WatchSpec;

/// Rows of one snapshot that matched one watch spec, in listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchMatch<'a> {
    pub spec: &'a WatchSpec,
    pub lines: Vec<&'a str>,
}

impl WatchMatch<'_> {
    /// True when exactly the expected number of instances matched.
    ///
    /// A spec expecting zero or fewer instances is never up.
    pub fn is_up(&self) -> bool {
        self.spec.expected_count > 0
            && i64::try_from(self.lines.len()).is_ok_and(|n| n == self.spec.expected_count)
    }
}

/// Assigns every row to every watch spec whose path token it contains.
///
/// A row may match any number of specs. Rows containing `self_name` are
/// skipped so the monitor never counts its own invocation; this only guards
/// against the monitor's own command line, not against the listing utility's.
/// An empty `self_name` disables the exclusion.
pub fn match_rows<'a, R: AsRef<str>>(
    rows: &'a [R],
    specs: &'a [WatchSpec],
    self_name: Option<&str>,
) -> Vec<WatchMatch<'a>> {
    let self_name = self_name.filter(|name| !name.is_empty());
    let mut matches: Vec<WatchMatch<'a>> = specs
        .iter()
        .map(|spec| WatchMatch {
            spec,
            lines: Vec::new(),
        })
        .collect();

    for row in rows {
        let row = row.as_ref();
        if self_name.is_some_and(|name| row.contains(name)) {
            trace!(row, "skipping own invocation");
            continue;
        }
        for m in matches.iter_mut() {
            if m.spec.matches(row) {
                m.lines.push(row);
            }
        }
    }

    matches
}
