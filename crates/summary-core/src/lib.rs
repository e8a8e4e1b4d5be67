//! Shared building blocks for the timesheet summary workspace.
//!
//! Holds the row and summary models, the duration and date parsers the
//! aggregation engine relies on, display formatting, timeline window maths,
//! the error type and the command-line settings.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{Result, SummaryError};
