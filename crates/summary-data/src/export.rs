//! Export serializer and its file writers.
//!
//! [`build_export_rows`] flattens a [`Summary`] into the four-column report
//! layout. The writers only decide how those rows land on disk (XLSX, CSV)
//! or on a terminal (plain text).

use std::fmt::Write as _;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use summary_core::formatting::{format_hours, format_mandays};
use summary_core::models::Summary;
use summary_core::{Result, SummaryError};
use tracing::info;

/// Column headers of the exported sheet.
pub const EXPORT_HEADERS: [&str; 4] = ["Project Name", "Task Name", "Manhours", "Mandays"];

/// Worksheet name used by the XLSX writer.
pub const SHEET_NAME: &str = "Summary";

/// Character widths of the four columns.
const COLUMN_WIDTHS: [f64; 4] = [40.0, 40.0, 15.0, 15.0];

// ── Rows ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ExportCell {
    Text(String),
    Number(f64),
    Empty,
}

impl ExportCell {
    fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Cell content for text sinks; numbers keep full precision.
    pub fn as_plain(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Empty => String::new(),
        }
    }
}

/// One report row: project, task, manhours, mandays.
pub type ExportRow = [ExportCell; 4];

fn blank_row() -> ExportRow {
    [
        ExportCell::Empty,
        ExportCell::Empty,
        ExportCell::Empty,
        ExportCell::Empty,
    ]
}

fn label_row(label: impl Into<String>) -> ExportRow {
    [
        ExportCell::text(label),
        ExportCell::text(""),
        ExportCell::text(""),
        ExportCell::text(""),
    ]
}

/// Flatten `summary` into report rows (without the column header row).
///
/// Layout: title, working-day count, blank; then for each project its total
/// row, one row per task and a blank separator; finally the grand total.
pub fn build_export_rows(summary: &Summary) -> Vec<ExportRow> {
    let mut rows = vec![
        label_row("SUMMARY REPORT"),
        label_row(format!("Total Working Days: {}", summary.total_working_days)),
        blank_row(),
    ];

    let mut grand_manhours = 0.0;
    let mut grand_mandays = 0.0;

    for project in &summary.projects {
        rows.push([
            ExportCell::text(&project.project_name),
            ExportCell::text(""),
            ExportCell::Number(project.total_manhours),
            ExportCell::Number(project.total_mandays),
        ]);
        grand_manhours += project.total_manhours;
        grand_mandays += project.total_mandays;

        for task in &project.tasks {
            rows.push([
                ExportCell::text(""),
                ExportCell::text(&task.task_name),
                ExportCell::Number(task.manhours),
                ExportCell::Number(task.mandays),
            ]);
        }
        rows.push(blank_row());
    }

    rows.push([
        ExportCell::text("GRAND TOTAL"),
        ExportCell::text(""),
        ExportCell::Number(grand_manhours),
        ExportCell::Number(grand_mandays),
    ]);
    rows
}

// ── Writers ───────────────────────────────────────────────────────────────────

/// Write the report to `path`, picking the writer from the extension
/// (`.xlsx` or `.csv`).
pub fn export_summary(summary: &Summary, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "xlsx" => write_xlsx(summary, path),
        "csv" => write_csv(summary, path),
        _ => Err(SummaryError::Export(format!(
            "unsupported export extension for {} (use .xlsx or .csv)",
            path.display()
        ))),
    }
}

/// Write the report as a single-sheet workbook.
pub fn write_xlsx(summary: &Summary, path: &Path) -> Result<()> {
    let rows = build_export_rows(summary);
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(xlsx_error)?;

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        sheet.set_column_width(col as u16, *width).map_err(xlsx_error)?;
    }
    for (col, title) in EXPORT_HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *title, &header)
            .map_err(xlsx_error)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let c = col as u16;
            match cell {
                ExportCell::Text(s) if !s.is_empty() => {
                    sheet.write_string(r, c, s).map_err(xlsx_error)?;
                }
                ExportCell::Number(n) => {
                    sheet.write_number(r, c, *n).map_err(xlsx_error)?;
                }
                _ => {}
            }
        }
    }

    workbook.save(path).map_err(xlsx_error)?;
    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write the report as CSV with the column header row first.
pub fn write_csv(summary: &Summary, path: &Path) -> Result<()> {
    let rows = build_export_rows(summary);
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(EXPORT_HEADERS)?;
    for row in &rows {
        writer.write_record(row.iter().map(ExportCell::as_plain))?;
    }
    writer.flush()?;
    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Render the report as an aligned plain-text table.
pub fn render_text(summary: &Summary) -> String {
    let rows = build_export_rows(summary);
    let cell = |c: &ExportCell| match c {
        ExportCell::Number(n) => format_hours(*n),
        other => other.as_plain(),
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<40} {:<40} {:>12} {:>12}",
        EXPORT_HEADERS[0], EXPORT_HEADERS[1], EXPORT_HEADERS[2], EXPORT_HEADERS[3]
    );
    for row in &rows {
        let line = format!(
            "{:<40} {:<40} {:>12} {:>12}",
            cell(&row[0]),
            cell(&row[1]),
            cell(&row[2]),
            match &row[3] {
                ExportCell::Number(n) => format_mandays(*n),
                other => other.as_plain(),
            }
        );
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

fn xlsx_error(err: XlsxError) -> SummaryError {
    SummaryError::Export(err.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
