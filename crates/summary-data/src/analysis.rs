//! Month re-aggregation, project selection and dashboard metrics.
//!
//! Everything here sits on top of [`TimesheetAggregator`]: filters are applied
//! to raw rows and the engine is simply run again on the subset.

use std::collections::BTreeSet;

use serde::Serialize;
use summary_core::data_processors::DateParser;
use summary_core::formatting::percentage;
use summary_core::models::{RawEntry, Summary};
use tracing::debug;

use crate::aggregator::TimesheetAggregator;

/// Number of tasks listed in the dashboard's top-task ranking.
pub const TOP_TASK_LIMIT: usize = 8;

// ── Month filtering ───────────────────────────────────────────────────────────

/// Distinct `YYYY-MM` keys present in `entries`, newest first.
///
/// Rows without a usable date contribute nothing.
pub fn available_months(entries: &[RawEntry]) -> Vec<String> {
    let months: BTreeSet<String> = entries
        .iter()
        .filter_map(|e| DateParser::month_key(&e.date))
        .collect();
    months.into_iter().rev().collect()
}

/// Rows whose month key is in `accepted`.
pub fn filter_by_months<'a, S: AsRef<str>>(
    entries: &'a [RawEntry],
    accepted: &'a [S],
) -> impl Iterator<Item = &'a RawEntry> + 'a {
    entries.iter().filter(move |e| {
        DateParser::month_key(&e.date)
            .is_some_and(|key| accepted.iter().any(|m| m.as_ref() == key))
    })
}

/// Run the engine over the rows of the `accepted` months only.
///
/// The filter is strict: an empty `accepted` list yields an empty summary,
/// and rows without a month key never pass.
pub fn reaggregate<S: AsRef<str>>(entries: &[RawEntry], accepted: &[S]) -> Summary {
    let subset: Vec<RawEntry> = filter_by_months(entries, accepted).cloned().collect();
    debug!(
        "Re-aggregating {} of {} rows for {} months",
        subset.len(),
        entries.len(),
        accepted.len()
    );
    TimesheetAggregator::aggregate(&subset)
}

// ── Project selection ─────────────────────────────────────────────────────────

/// Keep only the projects named in `names`; an empty list keeps everything.
///
/// `total_working_days` is carried over unchanged since it describes the
/// underlying rows, not the selection.
pub fn select_projects<S: AsRef<str>>(summary: &Summary, names: &[S]) -> Summary {
    if names.is_empty() {
        return summary.clone();
    }
    Summary {
        projects: summary
            .projects
            .iter()
            .filter(|p| names.iter().any(|n| n.as_ref() == p.project_name))
            .cloned()
            .collect(),
        total_working_days: summary.total_working_days,
    }
}

// ── SummaryReport ─────────────────────────────────────────────────────────────

/// Raw rows together with the month selection and the summary it produces.
///
/// An empty selection, or one covering every available month, means
/// "unfiltered": the summary is built from all rows, including those whose
/// date has no month.
#[derive(Debug, Clone)]
pub struct SummaryReport {
    entries: Vec<RawEntry>,
    months: Vec<String>,
    selected: BTreeSet<String>,
    summary: Summary,
}

impl SummaryReport {
    pub fn new(entries: Vec<RawEntry>) -> Self {
        let months = available_months(&entries);
        let summary = TimesheetAggregator::aggregate(&entries);
        Self {
            entries,
            months,
            selected: BTreeSet::new(),
            summary,
        }
    }

    /// Build a report with `months` preselected. Unknown months are ignored.
    pub fn with_months<S: AsRef<str>>(entries: Vec<RawEntry>, months: &[S]) -> Self {
        let mut report = Self::new(entries);
        report.set_selection(months.iter().map(|m| m.as_ref().to_string()));
        report
    }

    pub fn entries(&self) -> &[RawEntry] {
        &self.entries
    }

    /// Months available for selection, newest first.
    pub fn months(&self) -> &[String] {
        &self.months
    }

    pub fn is_selected(&self, month: &str) -> bool {
        self.selected.contains(month)
    }

    pub fn selected_months(&self) -> Vec<String> {
        self.selected.iter().rev().cloned().collect()
    }

    pub fn is_filtered(&self) -> bool {
        !self.selected.is_empty() && self.selected.len() < self.months.len()
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn toggle_month(&mut self, month: &str) {
        let mut selected = self.selected.clone();
        if !selected.remove(month) {
            selected.insert(month.to_string());
        }
        self.set_selection(selected);
    }

    pub fn select_all(&mut self) {
        self.set_selection(self.months.clone());
    }

    pub fn select_none(&mut self) {
        self.set_selection(Vec::new());
    }

    fn set_selection(&mut self, months: impl IntoIterator<Item = String>) {
        self.selected = months
            .into_iter()
            .filter(|m| self.months.contains(m))
            .collect();
        self.summary = if self.is_filtered() {
            let accepted: Vec<&String> = self.selected.iter().collect();
            reaggregate(&self.entries, &accepted)
        } else {
            TimesheetAggregator::aggregate(&self.entries)
        };
    }
}

// ── Dashboard ─────────────────────────────────────────────────────────────────

/// A project's slice of the total hours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectShare {
    pub project_name: String,
    pub manhours: f64,
    pub mandays: f64,
    /// Share of all hours in percent, one decimal.
    pub percentage: f64,
}

/// A task together with the project it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskShare {
    pub task_name: String,
    pub project_name: String,
    pub manhours: f64,
    pub mandays: f64,
}

/// Key figures shown on the dashboard view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_manhours: f64,
    pub total_mandays: f64,
    pub working_days: usize,
    pub avg_hours_per_day: f64,
    /// Projects by hours, largest first.
    pub project_ranking: Vec<ProjectShare>,
    /// At most [`TOP_TASK_LIMIT`] tasks by hours, largest first.
    pub top_tasks: Vec<TaskShare>,
}

impl DashboardStats {
    pub fn from_summary(summary: &Summary) -> Self {
        let total_manhours = summary.grand_total_manhours();
        let total_mandays = summary.grand_total_mandays();
        let working_days = summary.total_working_days;
        let avg_hours_per_day = if working_days == 0 {
            0.0
        } else {
            total_manhours / working_days as f64
        };

        let mut project_ranking: Vec<ProjectShare> = summary
            .projects
            .iter()
            .map(|p| ProjectShare {
                project_name: p.project_name.clone(),
                manhours: p.total_manhours,
                mandays: p.total_mandays,
                percentage: percentage(p.total_manhours, total_manhours, 1),
            })
            .collect();
        project_ranking.sort_by(|a, b| b.manhours.total_cmp(&a.manhours));

        let mut top_tasks: Vec<TaskShare> = summary
            .projects
            .iter()
            .flat_map(|p| {
                p.tasks.iter().map(|t| TaskShare {
                    task_name: t.task_name.clone(),
                    project_name: p.project_name.clone(),
                    manhours: t.manhours,
                    mandays: t.mandays,
                })
            })
            .collect();
        top_tasks.sort_by(|a, b| b.manhours.total_cmp(&a.manhours));
        top_tasks.truncate(TOP_TASK_LIMIT);

        Self {
            total_manhours,
            total_mandays,
            working_days,
            avg_hours_per_day,
            project_ranking,
            top_tasks,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
