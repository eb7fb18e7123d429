//! procwatch - process watch-list monitor library.
//!
//! Samples the process table once, checks that each watched process runs the
//! expected number of instances and reports their combined resource usage as
//! `<metricId>|<value>|<objectLabel>` lines.
//!
//! - `collector` - process listing sources (`ps`, captured files, mocks)
//! - `config` - startup configuration and its errors
//! - `metrics` - metric definitions, mask and records
//! - `monitor` - row matching and column aggregation
//! - `report` - mask filtering and line output
//! - `watch` - watch-list parsing

pub mod collector;
pub mod config;
pub mod metrics;
pub mod monitor;
pub mod report;
pub mod util;
pub mod watch;
