//! Process listing collection.
//!
//! This module obtains the process table as raw text rows and knows how to
//! read the resource columns of a row. It does no matching itself.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                     Monitor                      │
//! └────────────────────────┬─────────────────────────┘
//!                          │ fetch()
//!                  ┌───────▼────────┐
//!                  │ SnapshotSource │ (trait)
//!                  └───────┬────────┘
//!          ┌───────────────┼───────────────┐
//!          │               │               │
//!   ┌──────▼──────┐ ┌──────▼──────┐ ┌──────▼──────┐
//!   │  PsCommand  │ │SnapshotFile │ │ MockSource  │
//!   │ (ps auxww)  │ │ (captured)  │ │ (Testing)   │
//!   └─────────────┘ └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production
//!
//! ```ignore
//! use procwatch::collector::{PsCommand, SnapshotSource};
//!
//! let snapshot = PsCommand::default().fetch().unwrap();
//! ```
//!
//! ## Testing (with MockSource)
//!
//! ```
//! use procwatch::collector::{MockSource, SnapshotSource};
//!
//! let snapshot = MockSource::typical_system().fetch().unwrap();
//! assert!(!snapshot.is_empty());
//! ```

mod file;
pub mod mock;
pub mod parser;
pub mod traits;

pub use file::SnapshotFile;
pub use mock::MockSource;
pub use parser::{ParseError, PsRow, parse_ps_row};
pub use traits::{AcquireError, DEFAULT_PS_COMMAND, PsCommand, Snapshot, SnapshotSource};
