//! Terminal UI for timesheet summaries.
//!
//! Themes, small line components, the table, timeline and dashboard views,
//! and the [`app::App`] event loop that ties them to a month filter.

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod table_view;
pub mod themes;
pub mod timeline_view;

pub use summary_core as core;
