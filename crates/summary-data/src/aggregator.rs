//! The timesheet aggregation engine.
//!
//! Turns a flat list of [`RawEntry`] rows into a [`Summary`]: per-project,
//! per-task hours and mandays, activity date ranges and the global working
//! day count. The engine is pure and infallible; malformed cells degrade to
//! zero hours or a missing date.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use summary_core::data_processors::{DateParser, DurationParser};
use summary_core::models::{
    to_mandays, DateRange, ProjectAggregate, RawEntry, Summary, TaskAggregate, LEAVE,
};
use tracing::debug;

/// Hours credited to a Leave row that is the only record on its date.
pub const FULL_DAY_LEAVE_HOURS: f64 = 8.0;

/// Hours credited to a Leave row that shares its date with other records.
pub const HALF_DAY_LEAVE_HOURS: f64 = 4.0;

/// Largest gap, in days, between two active dates of the same range.
pub const RANGE_GAP_DAYS: i64 = 30;

// ── TaskStats ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
struct TaskStats {
    manhours: f64,
    mandays: f64,
}

impl TaskStats {
    fn add_hours(&mut self, hours: f64) {
        self.manhours += hours;
        self.mandays += to_mandays(hours);
    }
}

// ── RowClassification ─────────────────────────────────────────────────────────

/// Where a single non-rejected row lands and how many hours it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct RowClassification {
    pub project_name: String,
    /// Empty when the row has a project but no task; such rows are dropped.
    pub task_name: String,
    pub hours: f64,
}

// ── TimesheetAggregator ───────────────────────────────────────────────────────

/// Stateless engine that groups timesheet rows by project and task.
pub struct TimesheetAggregator;

impl TimesheetAggregator {
    /// Aggregate `entries` into a [`Summary`].
    ///
    /// Pass one counts non-rejected records per raw date string. Pass two
    /// classifies every non-rejected row, accumulates its hours into the
    /// `(project, task)` bucket and records its parsed date for the project.
    pub fn aggregate(entries: &[RawEntry]) -> Summary {
        let records_by_date = Self::records_by_date(entries);

        let mut buckets: BTreeMap<String, BTreeMap<String, TaskStats>> = BTreeMap::new();
        let mut project_dates: HashMap<String, BTreeSet<NaiveDate>> = HashMap::new();
        let mut rejected = 0usize;
        let mut dropped = 0usize;

        for entry in entries {
            if entry.is_rejected() {
                rejected += 1;
                continue;
            }

            let row = Self::classify(entry, &records_by_date);
            if row.task_name.is_empty() {
                dropped += 1;
                continue;
            }

            if let Some(date) = DateParser::parse(&entry.date) {
                project_dates
                    .entry(row.project_name.clone())
                    .or_default()
                    .insert(date);
            }

            buckets
                .entry(row.project_name)
                .or_default()
                .entry(row.task_name)
                .or_default()
                .add_hours(row.hours);
        }

        let mut projects: Vec<ProjectAggregate> = buckets
            .into_iter()
            .map(|(project_name, tasks)| {
                let dates = project_dates.remove(&project_name).unwrap_or_default();
                Self::build_project(project_name, tasks, &dates)
            })
            .collect();

        projects.sort_by(|a, b| compare_start_dates(a.start_date, b.start_date));

        debug!(
            "Aggregated {} rows into {} projects ({} rejected, {} without task)",
            entries.len(),
            projects.len(),
            rejected,
            dropped
        );

        Summary {
            projects,
            total_working_days: records_by_date.len(),
        }
    }

    /// Number of distinct raw date strings among non-rejected rows.
    ///
    /// Dates are compared as written; the same day spelled two ways counts
    /// twice.
    pub fn count_working_days(entries: &[RawEntry]) -> usize {
        Self::records_by_date(entries).len()
    }

    /// Non-rejected record count per raw date string.
    pub fn records_by_date(entries: &[RawEntry]) -> HashMap<&str, usize> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for entry in entries.iter().filter(|e| !e.is_rejected()) {
            *counts.entry(entry.date.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Resolve project, task and hours for a non-rejected row.
    ///
    /// Rows without a project become Leave. Leave hours ignore the sheet:
    /// a lone record on its date is a full day, otherwise half a day.
    pub fn classify(entry: &RawEntry, records_by_date: &HashMap<&str, usize>) -> RowClassification {
        if !entry.project_name.is_empty() {
            return RowClassification {
                project_name: entry.project_name.clone(),
                task_name: entry.task.clone(),
                hours: DurationParser::parse_hours(&entry.hours_worked_text),
            };
        }

        let task_name = if entry.task.is_empty() {
            LEAVE.to_string()
        } else {
            entry.task.clone()
        };
        let records = records_by_date
            .get(entry.date.as_str())
            .copied()
            .unwrap_or(0);
        let hours = if records == 1 {
            FULL_DAY_LEAVE_HOURS
        } else {
            HALF_DAY_LEAVE_HOURS
        };

        RowClassification {
            project_name: LEAVE.to_string(),
            task_name,
            hours,
        }
    }

    /// Split chronologically sorted, distinct `dates` into activity ranges.
    ///
    /// A new range starts whenever the next date lies more than
    /// [`RANGE_GAP_DAYS`] after the end of the running range.
    pub fn build_date_ranges<'a>(dates: impl IntoIterator<Item = &'a NaiveDate>) -> Vec<DateRange> {
        let mut ranges = Vec::new();
        let mut current: Option<DateRange> = None;

        for &date in dates {
            current = Some(match current {
                None => DateRange {
                    start: date,
                    end: date,
                },
                Some(mut range) => {
                    if (date - range.end).num_days() > RANGE_GAP_DAYS {
                        ranges.push(range);
                        DateRange {
                            start: date,
                            end: date,
                        }
                    } else {
                        range.end = date;
                        range
                    }
                }
            });
        }

        ranges.extend(current);
        ranges
    }

    fn build_project(
        project_name: String,
        tasks: BTreeMap<String, TaskStats>,
        dates: &BTreeSet<NaiveDate>,
    ) -> ProjectAggregate {
        let mut tasks: Vec<TaskAggregate> = tasks
            .into_iter()
            .map(|(task_name, stats)| TaskAggregate {
                task_name,
                manhours: stats.manhours,
                mandays: stats.mandays,
            })
            .collect();
        tasks.sort_by(|a, b| a.manhours.total_cmp(&b.manhours));

        let total_manhours = tasks.iter().map(|t| t.manhours).sum();
        let total_mandays = tasks.iter().map(|t| t.mandays).sum();

        ProjectAggregate {
            project_name,
            tasks,
            total_manhours,
            total_mandays,
            start_date: dates.first().copied(),
            end_date: dates.last().copied(),
            date_ranges: Self::build_date_ranges(dates),
        }
    }
}

/// Ascending by date, with a missing start date ordered after any date.
fn compare_start_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
