use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Project and task name assigned to rows that carry no project.
pub const LEAVE: &str = "Leave";

/// Status value marking a row that must be ignored entirely.
pub const REJECT_STATUS: &str = "Reject";

/// Working hours that make up one manday.
pub const HOURS_PER_MANDAY: f64 = 8.0;

/// Convert an hour count into mandays.
pub fn to_mandays(hours: f64) -> f64 {
    hours / HOURS_PER_MANDAY
}

/// A single timesheet row as decoded from the spreadsheet export.
///
/// Every field is kept as raw text; interpretation (durations, dates, the
/// Leave fallback) happens in the aggregation engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Calendar date exactly as it appears in the sheet.
    #[serde(rename = "Date", default, deserialize_with = "cell_text")]
    pub date: String,
    /// Free-text duration, e.g. `"5h 00m (13:00:00 - 18:00:00)"`.
    #[serde(rename = "Hours Worked", default, deserialize_with = "cell_text")]
    pub hours_worked_text: String,
    /// Project the time was booked against; empty for leave.
    #[serde(rename = "Project Name", default, deserialize_with = "cell_text")]
    pub project_name: String,
    /// Task within the project.
    #[serde(rename = "Task", default, deserialize_with = "cell_text")]
    pub task: String,
    /// Free-form detail text. Not used by the engine.
    #[serde(rename = "Task Detail", default, deserialize_with = "cell_text")]
    pub task_detail: String,
    /// Approval status; [`REJECT_STATUS`] excludes the row.
    #[serde(rename = "Status", default, deserialize_with = "cell_text")]
    pub status: String,
}

impl RawEntry {
    /// Whether this row was rejected and must not contribute anywhere.
    pub fn is_rejected(&self) -> bool {
        self.status == REJECT_STATUS
    }
}

/// Accept strings, numbers, booleans or null for a spreadsheet cell.
fn cell_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Accumulated effort for one task within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAggregate {
    pub task_name: String,
    pub manhours: f64,
    pub mandays: f64,
}

/// A contiguous window of activity on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Accumulated effort and activity window for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAggregate {
    pub project_name: String,
    /// Tasks sorted ascending by `manhours`.
    pub tasks: Vec<TaskAggregate>,
    pub total_manhours: f64,
    pub total_mandays: f64,
    /// Earliest parsed date, `None` when no row had a usable date.
    pub start_date: Option<NaiveDate>,
    /// Latest parsed date, `None` when no row had a usable date.
    pub end_date: Option<NaiveDate>,
    /// Chronological, disjoint activity windows.
    pub date_ranges: Vec<DateRange>,
}

impl ProjectAggregate {
    /// Look up a task by exact name.
    pub fn task(&self, name: &str) -> Option<&TaskAggregate> {
        self.tasks.iter().find(|t| t.task_name == name)
    }

    /// Whether this is the synthetic Leave bucket.
    pub fn is_leave(&self) -> bool {
        self.project_name == LEAVE
    }
}

/// The complete output of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Projects sorted ascending by start date, dateless projects last.
    pub projects: Vec<ProjectAggregate>,
    /// Distinct raw date strings among non-rejected rows.
    pub total_working_days: usize,
}

impl Summary {
    /// Look up a project by exact name.
    pub fn project(&self, name: &str) -> Option<&ProjectAggregate> {
        self.projects.iter().find(|p| p.project_name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Sum of every project's manhours.
    pub fn grand_total_manhours(&self) -> f64 {
        self.projects.iter().map(|p| p.total_manhours).sum()
    }

    /// Sum of every project's mandays.
    pub fn grand_total_mandays(&self) -> f64 {
        self.projects.iter().map(|p| p.total_mandays).sum()
    }

    /// Project names in display order.
    pub fn project_names(&self) -> Vec<String> {
        self.projects.iter().map(|p| p.project_name.clone()).collect()
    }
}
