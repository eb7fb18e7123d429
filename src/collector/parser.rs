//! Parser for rows of the process listing.
//!
//! This is the only place that knows the listing's column layout:
//!
//! ```text
//! USER  PID  %CPU %MEM  VSZ  RSS  TT  STAT STARTED  TIME COMMAND
//!  0     1    2    3     4    5    6   7    8        9    10..
//! ```
//!
//! Rows are split on runs of whitespace. VSZ and RSS are in kilobytes.

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

const CPU_FIELD: usize = 2;
const MEM_FIELD: usize = 3;
const VSZ_FIELD: usize = 4;
const RSS_FIELD: usize = 5;

/// Resource columns of one listing row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PsRow {
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub vsz_kb: u64,
    pub rss_kb: u64,
}

/// Parses one row of `ps auxww` output.
pub fn parse_ps_row(line: &str) -> Result<PsRow, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    if fields.len() <= RSS_FIELD {
        return Err(ParseError::new(format!(
            "not enough fields in row: expected {}+, got {}",
            RSS_FIELD + 1,
            fields.len()
        )));
    }

    let parse_f64 = |idx: usize, name: &str| -> Result<f64, ParseError> {
        fields[idx]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {} '{}'", name, fields[idx])))
    };

    let parse_u64 = |idx: usize, name: &str| -> Result<u64, ParseError> {
        fields[idx]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {} '{}'", name, fields[idx])))
    };

    Ok(PsRow {
        cpu_percent: parse_f64(CPU_FIELD, "%CPU")?,
        mem_percent: parse_f64(MEM_FIELD, "%MEM")?,
        vsz_kb: parse_u64(VSZ_FIELD, "VSZ")?,
        rss_kb: parse_u64(RSS_FIELD, "RSS")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ps_row() {
        let row = parse_ps_row(
            "app                501   1.5  0.8   102400  65536   ??  S    Mon09AM   1:02.10 /usr/local/bin/node   /srv/api/server.js",
        )
        .unwrap();

        assert_eq!(row.cpu_percent, 1.5);
        assert_eq!(row.mem_percent, 0.8);
        assert_eq!(row.vsz_kb, 102400);
        assert_eq!(row.rss_kb, 65536);
    }

    #[test]
    fn test_parse_leading_whitespace() {
        let row = parse_ps_row("   root 1 0.1 0.2 4096 1024").unwrap();
        assert_eq!(row.cpu_percent, 0.1);
        assert_eq!(row.rss_kb, 1024);
    }

    #[test]
    fn test_parse_header_row() {
        let err = parse_ps_row("USER PID %CPU %MEM VSZ RSS TT STAT STARTED TIME COMMAND").unwrap_err();
        assert!(err.message.contains("%CPU"));
    }

    #[test]
    fn test_parse_truncated_row() {
        let err = parse_ps_row("root 1 0.1 0.2").unwrap_err();
        assert_eq!(err.message, "not enough fields in row: expected 6+, got 4");
    }
}
