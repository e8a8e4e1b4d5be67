//! Data layer for the timesheet summary.
//!
//! Decodes timesheet exports into raw rows, runs the aggregation engine,
//! applies month and project filters, derives dashboard metrics and writes
//! the flattened report back out.

pub mod aggregator;
pub mod analysis;
pub mod export;
pub mod reader;

pub use summary_core as core;
