//! Abstractions for obtaining the process listing.
//!
//! The `SnapshotSource` trait lets the monitor work with the real `ps` utility
//! as well as with captured listings and in-memory mocks for testing.

use std::fmt;
use std::io;
use std::process::Command;

use tracing::debug;

use crate::config::ConfigError;

/// Default listing utility: all processes, all users, wide output.
pub const DEFAULT_PS_COMMAND: &str = "ps auxww";

/// Error type for snapshot acquisition failures.
#[derive(Debug)]
pub enum AcquireError {
    /// The listing utility could not be started.
    Spawn { program: String, source: io::Error },
    /// The listing utility exited unsuccessfully.
    ExitStatus { program: String, code: Option<i32> },
    /// A captured listing could not be read.
    Read(io::Error),
}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquireError::Spawn { program, source } => {
                write!(f, "failed to run '{}': {}", program, source)
            }
            AcquireError::ExitStatus {
                program,
                code: Some(code),
            } => write!(f, "'{}' exited with status {}", program, code),
            AcquireError::ExitStatus {
                program,
                code: None,
            } => write!(f, "'{}' was terminated by a signal", program),
            AcquireError::Read(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for AcquireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AcquireError::Spawn { source, .. } => Some(source),
            AcquireError::Read(e) => Some(e),
            AcquireError::ExitStatus { .. } => None,
        }
    }
}

impl From<io::Error> for AcquireError {
    fn from(e: io::Error) -> Self {
        AcquireError::Read(e)
    }
}

/// Point-in-time process listing, one raw row per entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    rows: Vec<String>,
}

impl Snapshot {
    pub fn new(rows: Vec<String>) -> Self {
        Self { rows }
    }

    /// Builds a snapshot from the raw listing text.
    ///
    /// The whole text is trimmed before being split into lines, so leading or
    /// trailing blank lines never become rows.
    pub fn from_output(output: &str) -> Self {
        let trimmed = output.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        Self {
            rows: trimmed.lines().map(str::to_string).collect(),
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Source of process listings.
pub trait SnapshotSource {
    /// Takes one snapshot of the process table.
    fn fetch(&self) -> Result<Snapshot, AcquireError>;
}

impl<S: SnapshotSource + ?Sized> SnapshotSource for &S {
    fn fetch(&self) -> Result<Snapshot, AcquireError> {
        (**self).fetch()
    }
}

impl<S: SnapshotSource + ?Sized> SnapshotSource for Box<S> {
    fn fetch(&self) -> Result<Snapshot, AcquireError> {
        (**self).fetch()
    }
}

/// Runs the system listing utility and captures its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsCommand {
    program: String,
    args: Vec<String>,
}

impl PsCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parses a whitespace-separated command line such as `ps auxww`.
    pub fn from_command_line(command_line: &str) -> Result<Self, ConfigError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ConfigError::EmptyCommand)?;
        Ok(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for PsCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl Default for PsCommand {
    fn default() -> Self {
        Self::new("ps", vec!["auxww".to_string()])
    }
}

impl SnapshotSource for PsCommand {
    fn fetch(&self) -> Result<Snapshot, AcquireError> {
        debug!(program = %self.program, args = ?self.args, "running process listing");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| AcquireError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AcquireError::ExitStatus {
                program: self.program.clone(),
                code: output.status.code(),
            });
        }

        let snapshot = Snapshot::from_output(&String::from_utf8_lossy(&output.stdout));
        debug!(rows = snapshot.len(), "process listing captured");
        Ok(snapshot)
    }
}
