use chrono::{Duration, NaiveDate};

use crate::models::{DateRange, ProjectAggregate};

/// Days of padding added before the first and after the last active date.
pub const TIMELINE_PADDING_DAYS: i64 = 2;

// ── TimelineWindow ────────────────────────────────────────────────────────────

/// The calendar window a timeline is drawn over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimelineWindow {
    /// Span the earliest start and latest end across `projects`, padded by
    /// [`TIMELINE_PADDING_DAYS`] on both sides.
    ///
    /// Returns `None` when no project has a date.
    pub fn from_projects(projects: &[ProjectAggregate]) -> Option<Self> {
        let min = projects.iter().filter_map(|p| p.start_date).min()?;
        let max = projects.iter().filter_map(|p| p.end_date).max()?;
        let padding = Duration::days(TIMELINE_PADDING_DAYS);
        Some(Self {
            start: min - padding,
            end: max + padding,
        })
    }

    /// Number of days between the window edges (never less than 1).
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days().max(1)
    }

    /// Relative position of `date` inside the window, `0.0` at the start and
    /// `1.0` at the end. Dates outside the window are clamped.
    pub fn position(&self, date: NaiveDate) -> f64 {
        let offset = (date - self.start).num_days() as f64;
        (offset / self.total_days() as f64).clamp(0.0, 1.0)
    }

    /// Map a date range onto `width` columns as `(first_column, length)`.
    ///
    /// Every range occupies at least one column.
    pub fn columns(&self, range: &DateRange, width: u16) -> (u16, u16) {
        if width == 0 {
            return (0, 0);
        }
        let w = f64::from(width);
        let first = ((self.position(range.start) * w).floor() as u16).min(width - 1);
        let last = ((self.position(range.end) * w).ceil() as u16).clamp(first + 1, width);
        (first, last - first)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
