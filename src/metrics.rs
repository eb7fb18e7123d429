//! Metric definitions and the records produced for each watched process.
//!
//! The set of metrics is fixed. Which of them get reported is decided once at
//! startup from a positional on/off mask and never changes afterwards.

use std::fmt;

use crate::config::ConfigError;

/// Kind of metric reported for a watched process.
///
/// Declaration order is the positional order of the enable mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Whether the expected number of instances is running.
    Status,
    /// Total virtual size, MB.
    VmMem,
    /// Total resident size, MB.
    PhMem,
    /// Total %MEM.
    MemUs,
    /// Total %CPU.
    CpuUs,
}

impl MetricKind {
    /// All kinds in mask order: STATUS, VM_MEM, PH_MEM, MEM_US, CPU_US.
    pub const ALL: [MetricKind; 5] = [
        MetricKind::Status,
        MetricKind::VmMem,
        MetricKind::PhMem,
        MetricKind::MemUs,
        MetricKind::CpuUs,
    ];

    /// Symbolic name.
    pub fn name(self) -> &'static str {
        match self {
            MetricKind::Status => "STATUS",
            MetricKind::VmMem => "VM_MEM",
            MetricKind::PhMem => "PH_MEM",
            MetricKind::MemUs => "MEM_US",
            MetricKind::CpuUs => "CPU_US",
        }
    }

    /// Identifier string used by the output protocol.
    pub fn id(self) -> &'static str {
        match self {
            MetricKind::Status => "27:Status:9",
            MetricKind::VmMem => "94:Proc Virtual Memory:4",
            MetricKind::PhMem => "18:Proc Physical Memory:4",
            MetricKind::MemUs => "92:% Proc Memory Utilization:6",
            MetricKind::CpuUs => "53:% Proc CPU Utilization:6",
        }
    }

    fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A metric together with its enabled flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDefinition {
    pub kind: MetricKind,
    pub id: &'static str,
    pub enabled: bool,
}

/// Immutable, ordered table of metric definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricTable {
    definitions: Vec<MetricDefinition>,
}

impl MetricTable {
    /// Table with every metric enabled.
    pub fn all_enabled() -> Self {
        Self::from_flags([true; 5])
    }

    fn from_flags(flags: [bool; 5]) -> Self {
        let definitions = MetricKind::ALL
            .iter()
            .zip(flags)
            .map(|(&kind, enabled)| MetricDefinition {
                kind,
                id: kind.id(),
                enabled,
            })
            .collect();
        Self { definitions }
    }

    /// Builds the table from a comma-separated `0`/`1` mask.
    ///
    /// Double quotes are stripped first, the orchestrator sometimes passes the
    /// mask quoted. The number of tokens must match the number of metrics.
    pub fn from_mask(mask: &str) -> Result<Self, ConfigError> {
        let mask = mask.replace('"', "");
        let tokens: Vec<&str> = mask.split(',').map(str::trim).collect();

        if tokens.len() != MetricKind::ALL.len() {
            return Err(ConfigError::MetricCount {
                expected: MetricKind::ALL.len(),
                got: tokens.len(),
            });
        }

        let mut flags = [false; 5];
        for (flag, (kind, token)) in flags.iter_mut().zip(MetricKind::ALL.iter().zip(&tokens)) {
            *flag = match *token {
                "1" => true,
                "0" => false,
                other => {
                    return Err(ConfigError::MetricFlag {
                        metric: kind.name(),
                        value: other.to_string(),
                    });
                }
            };
        }

        Ok(Self::from_flags(flags))
    }

    /// Looks up the definition for a kind.
    pub fn get(&self, kind: MetricKind) -> &MetricDefinition {
        &self.definitions[kind.position()]
    }

    pub fn is_enabled(&self, kind: MetricKind) -> bool {
        self.get(kind).enabled
    }

    /// Definitions in mask order.
    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.definitions.iter()
    }
}

/// Value carried by a metric record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// Up (`1`) or down (`0`).
    Status(bool),
    /// Aggregated amount, printed with two decimals. Exact ties round away
    /// from zero.
    Amount(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Status(up) => write!(f, "{}", u8::from(*up)),
            MetricValue::Amount(v) => write!(f, "{:.2}", (v * 100.0).round() / 100.0),
        }
    }
}

/// One reported metric for one watched process.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub kind: MetricKind,
    pub id: &'static str,
    pub value: MetricValue,
    /// Display label of the originating watch spec.
    pub object: String,
}

impl MetricRecord {
    pub fn new(kind: MetricKind, value: MetricValue, object: impl Into<String>) -> Self {
        Self {
            kind,
            id: kind.id(),
            value,
            object: object.into(),
        }
    }

    pub fn status(up: bool, object: impl Into<String>) -> Self {
        Self::new(MetricKind::Status, MetricValue::Status(up), object)
    }

    pub fn amount(kind: MetricKind, value: f64, object: impl Into<String>) -> Self {
        Self::new(kind, MetricValue::Amount(value), object)
    }
}

impl fmt::Display for MetricRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.id, self.value, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_order_matches_kinds() {
        let table = MetricTable::from_mask("1,0,1,0,1").unwrap();
        let enabled: Vec<_> = table
            .iter()
            .filter(|d| d.enabled)
            .map(|d| d.kind)
            .collect();
        assert_eq!(
            enabled,
            vec![MetricKind::Status, MetricKind::PhMem, MetricKind::CpuUs]
        );
        assert!(!table.is_enabled(MetricKind::VmMem));
        assert!(!table.is_enabled(MetricKind::MemUs));
    }

    #[test]
    fn test_mask_strips_quotes_and_spaces() {
        let table = MetricTable::from_mask("\"1, 1,1,1 ,0\"").unwrap();
        assert!(table.is_enabled(MetricKind::Status));
        assert!(!table.is_enabled(MetricKind::CpuUs));
    }

    #[test]
    fn test_mask_wrong_length() {
        let err = MetricTable::from_mask("1,1,1,1").unwrap_err();
        assert_eq!(
            err,
            ConfigError::MetricCount {
                expected: 5,
                got: 4
            }
        );
        assert!(MetricTable::from_mask("1,1,1,1,1,1").is_err());
        assert!(MetricTable::from_mask("").is_err());
    }

    #[test]
    fn test_mask_rejects_non_flag() {
        let err = MetricTable::from_mask("1,1,yes,1,1").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MetricFlag {
                metric: "PH_MEM",
                ..
            }
        ));
    }

    #[test]
    fn test_definition_ids() {
        let table = MetricTable::all_enabled();
        assert_eq!(table.get(MetricKind::Status).id, "27:Status:9");
        assert_eq!(
            table.get(MetricKind::CpuUs).id,
            "53:% Proc CPU Utilization:6"
        );
    }

    #[test]
    fn test_value_formatting() {
        assert_eq!(MetricValue::Status(true).to_string(), "1");
        assert_eq!(MetricValue::Status(false).to_string(), "0");
        assert_eq!(MetricValue::Amount(300.0).to_string(), "300.00");
        assert_eq!(MetricValue::Amount(4204.328125).to_string(), "4204.33");
    }

    #[test]
    fn test_value_tie_rounds_up() {
        // 1152 KB / 1024 = 1.125 exactly
        assert_eq!(MetricValue::Amount(1152.0 / 1024.0).to_string(), "1.13");
        assert_eq!(MetricValue::Amount(0.375).to_string(), "0.38");
        assert_eq!(MetricValue::Amount(2.5).to_string(), "2.50");
    }

    #[test]
    fn test_record_line() {
        let record = MetricRecord::amount(MetricKind::VmMem, 12.5, "/usr/sbin/sshd");
        assert_eq!(
            record.to_string(),
            "94:Proc Virtual Memory:4|12.50|/usr/sbin/sshd"
        );
    }
}
