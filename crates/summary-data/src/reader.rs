//! Timesheet input decoding.
//!
//! Reads the spreadsheet export (the XLSX workbook itself, a CSV save of it,
//! or a JSON array of row objects) into [`RawEntry`] rows. A decode failure aborts the whole load; the
//! engine is never handed partial data.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::str::FromStr;

use calamine::{Data, DataType, Reader, Xlsx};
use csv::{ReaderBuilder, StringRecord};
use summary_core::models::RawEntry;
use summary_core::{Result, SummaryError};
use tracing::{debug, info};

/// Header names of the six timesheet columns.
pub mod columns {
    pub const DATE: &str = "Date";
    pub const HOURS_WORKED: &str = "Hours Worked";
    pub const PROJECT_NAME: &str = "Project Name";
    pub const TASK: &str = "Task";
    pub const TASK_DETAIL: &str = "Task Detail";
    pub const STATUS: &str = "Status";
}

// ── InputFormat ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Pick by file extension.
    Auto,
    Xlsx,
    Csv,
    Json,
}

impl FromStr for InputFormat {
    type Err = SummaryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(SummaryError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl InputFormat {
    /// Resolve [`InputFormat::Auto`] against the extension of `path`.
    pub fn resolve(self, path: &Path) -> Result<Self> {
        if self != Self::Auto {
            return Ok(self);
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" | "txt" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "" => Err(SummaryError::UnsupportedFormat(format!(
                "cannot detect format of {} (no extension)",
                path.display()
            ))),
            other => Err(SummaryError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every timesheet row from `path`.
///
/// For XLSX and CSV input `skip_rows` leading rows are discarded and the
/// next one is taken as the header row. JSON input is already keyed by column name
/// and ignores `skip_rows`.
pub fn load_entries(path: &Path, format: InputFormat, skip_rows: usize) -> Result<Vec<RawEntry>> {
    let format = format.resolve(path)?;
    let file = File::open(path).map_err(|source| SummaryError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let entries = match format {
        InputFormat::Xlsx => read_xlsx(reader, skip_rows)?,
        InputFormat::Json => read_json(reader)?,
        InputFormat::Csv | InputFormat::Auto => read_csv(reader, skip_rows)?,
    };

    info!("Loaded {} rows from {}", entries.len(), path.display());
    Ok(entries)
}

/// Decode CSV rows, skipping `skip_rows` records before the header.
pub fn read_csv<R: Read>(reader: R, skip_rows: usize) -> Result<Vec<RawEntry>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = csv_reader.records();

    for _ in 0..skip_rows {
        match records.next() {
            Some(record) => {
                record?;
            }
            None => return Err(SummaryError::MissingColumn(columns::DATE.to_string())),
        }
    }

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(SummaryError::MissingColumn(columns::DATE.to_string())),
    };
    debug!("CSV header found after skipping {skip_rows} rows");
    decode_rows(&header, records.map(|r| r.map_err(SummaryError::from)), "CSV")
}

/// Decode the first worksheet of an XLSX workbook.
///
/// `skip_rows` counts from the top of the sheet, even when the first used
/// row sits further down.
pub fn read_xlsx<R: Read + Seek>(reader: R, skip_rows: usize) -> Result<Vec<RawEntry>> {
    let mut workbook: Xlsx<R> = Xlsx::new(reader).map_err(xlsx_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SummaryError::XlsxDecode("workbook has no sheets".to_string()))?
        .map_err(xlsx_error)?;

    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    let mut rows = range
        .rows()
        .map(|cells| StringRecord::from(cells.iter().map(cell_text).collect::<Vec<_>>()))
        .skip(skip_rows.saturating_sub(first_row));

    let header = rows
        .next()
        .ok_or_else(|| SummaryError::MissingColumn(columns::DATE.to_string()))?;
    debug!("XLSX header found at sheet row {}", skip_rows.max(first_row) + 1);
    decode_rows(&header, rows.map(Ok), "XLSX")
}

/// Decode a JSON array of row objects keyed by the column names.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<RawEntry>> {
    let entries: Vec<RawEntry> = serde_json::from_reader(reader)?;
    debug!("Decoded {} JSON rows", entries.len());
    Ok(entries)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Map data rows below `header` onto entries, dropping blank rows.
fn decode_rows<I>(header: &StringRecord, rows: I, kind: &str) -> Result<Vec<RawEntry>>
where
    I: IntoIterator<Item = Result<StringRecord>>,
{
    let layout = ColumnLayout::from_header(header)?;
    debug!("Column layout: {layout:?}");

    let mut entries = Vec::new();
    let mut blank = 0usize;
    for record in rows {
        let record = record?;
        if is_blank(&record) {
            blank += 1;
            continue;
        }
        entries.push(layout.entry(&record));
    }

    debug!("Decoded {} {kind} rows ({} blank skipped)", entries.len(), blank);
    Ok(entries)
}

/// Text of one worksheet cell. Numbers print without a trailing `.0`, date
/// cells as `YYYY-MM-DD`, and empty or error cells as an empty string.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::DateTime(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

fn xlsx_error(err: impl std::fmt::Display) -> SummaryError {
    SummaryError::XlsxDecode(err.to_string())
}

/// Column positions found in the header row. Only `Date` is mandatory.
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    date: usize,
    hours_worked: Option<usize>,
    project_name: Option<usize>,
    task: Option<usize>,
    task_detail: Option<usize>,
    status: Option<usize>,
}

impl ColumnLayout {
    fn from_header(header: &StringRecord) -> Result<Self> {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);
        let date = find(columns::DATE)
            .ok_or_else(|| SummaryError::MissingColumn(columns::DATE.to_string()))?;
        Ok(Self {
            date,
            hours_worked: find(columns::HOURS_WORKED),
            project_name: find(columns::PROJECT_NAME),
            task: find(columns::TASK),
            task_detail: find(columns::TASK_DETAIL),
            status: find(columns::STATUS),
        })
    }

    fn entry(&self, record: &StringRecord) -> RawEntry {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };
        RawEntry {
            date: cell(Some(self.date)),
            hours_worked_text: cell(self.hours_worked),
            project_name: cell(self.project_name),
            task: cell(self.task),
            task_detail: cell(self.task_detail),
            status: cell(self.status),
        }
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
