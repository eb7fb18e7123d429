//! Mock snapshot sources for testing.
//!
//! This module provides `MockSource` and pre-built scenarios for testing
//! the monitor without running the real `ps` utility.

mod scenarios;
mod source;

pub use scenarios::SELF_NAME;
pub use source::MockSource;
