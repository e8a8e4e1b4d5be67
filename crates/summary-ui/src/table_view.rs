//! Summary table view.
//!
//! One bold row per project (with its active period), indented task rows
//! beneath it and a grand-total row at the bottom.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use summary_core::formatting::{format_hours, format_mandays, format_period};
use summary_core::models::Summary;

use crate::themes::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Project { is_leave: bool },
    Task { is_leave: bool },
    Total,
}

/// A pre-formatted table line.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTableRow {
    pub kind: RowKind,
    pub label: String,
    /// `"02 Jan 24 – 20 Feb 24"` on project rows, empty otherwise.
    pub period: String,
    pub manhours: f64,
    pub mandays: f64,
}

/// Flatten `summary` into table lines in display order.
pub fn build_table_rows(summary: &Summary) -> Vec<SummaryTableRow> {
    let mut rows = Vec::new();
    for project in &summary.projects {
        let is_leave = project.is_leave();
        rows.push(SummaryTableRow {
            kind: RowKind::Project { is_leave },
            label: project.project_name.clone(),
            period: format_period(project.start_date, project.end_date),
            manhours: project.total_manhours,
            mandays: project.total_mandays,
        });
        rows.extend(project.tasks.iter().map(|task| SummaryTableRow {
            kind: RowKind::Task { is_leave },
            label: format!("  {}", task.task_name),
            period: String::new(),
            manhours: task.manhours,
            mandays: task.mandays,
        }));
    }
    rows.push(SummaryTableRow {
        kind: RowKind::Total,
        label: "GRAND TOTAL".to_string(),
        period: format!("{} working days", summary.total_working_days),
        manhours: summary.grand_total_manhours(),
        mandays: summary.grand_total_mandays(),
    });
    rows
}

/// Render the summary table into `area`. `state` carries the scroll cursor.
pub fn render_summary_table(
    frame: &mut Frame,
    area: Rect,
    summary: &Summary,
    state: &mut TableState,
    theme: &Theme,
) {
    let header = Row::new(
        ["Project / Task", "Period", "Manhours", "Mandays"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = build_table_rows(summary)
        .into_iter()
        .map(|row| {
            let style = match row.kind {
                RowKind::Project { is_leave: true } => theme.leave.patch(theme.table_project),
                RowKind::Project { .. } => theme.table_project,
                RowKind::Task { is_leave: true } => theme.leave,
                RowKind::Task { .. } => theme.table_task,
                RowKind::Total => theme.table_total,
            };
            Row::new(vec![
                Cell::from(row.label),
                Cell::from(row.period),
                Cell::from(Line::from(format_hours(row.manhours)).right_aligned()),
                Cell::from(Line::from(format_mandays(row.mandays)).right_aligned()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(24),
        Constraint::Length(22),
        Constraint::Length(12),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Summary "),
        )
        .row_highlight_style(theme.cursor)
        .style(theme.text);

    frame.render_stateful_widget(table, area, state);
}

/// Placeholder shown when the current selection produced no projects.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No timesheet entries to summarise", theme.error)),
        Line::from(""),
        Line::from(Span::styled(
            "Check the month filter or the --skip-rows setting.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Timesheet Summary "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;
    use summary_core::models::{ProjectAggregate, TaskAggregate, LEAVE};

    fn task(name: &str, hours: f64) -> TaskAggregate {
        TaskAggregate {
            task_name: name.to_string(),
            manhours: hours,
            mandays: hours / 8.0,
        }
    }

    fn make_summary() -> Summary {
        let alpha_tasks = vec![task("Review", 3.0), task("Build", 9.0)];
        Summary {
            projects: vec![
                ProjectAggregate {
                    project_name: "Alpha".to_string(),
                    tasks: alpha_tasks,
                    total_manhours: 12.0,
                    total_mandays: 1.5,
                    start_date: NaiveDate::from_ymd_opt(2024, 1, 2),
                    end_date: NaiveDate::from_ymd_opt(2024, 2, 20),
                    date_ranges: vec![],
                },
                ProjectAggregate {
                    project_name: LEAVE.to_string(),
                    tasks: vec![task(LEAVE, 8.0)],
                    total_manhours: 8.0,
                    total_mandays: 1.0,
                    start_date: None,
                    end_date: None,
                    date_ranges: vec![],
                },
            ],
            total_working_days: 4,
        }
    }

    fn buffer_text(buffer: &Buffer) -> String {
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    // ── build_table_rows ──────────────────────────────────────────────────────

    #[test]
    fn test_build_table_rows_order() {
        let rows = build_table_rows(&make_summary());
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Alpha", "  Review", "  Build", "Leave", "  Leave", "GRAND TOTAL"]
        );
        assert_eq!(rows[0].kind, RowKind::Project { is_leave: false });
        assert_eq!(rows[0].period, "02 Jan 24 – 20 Feb 24");
        assert_eq!(rows[3].period, "");
        assert_eq!(rows[4].kind, RowKind::Task { is_leave: true });

        let total = rows.last().unwrap();
        assert_eq!(total.kind, RowKind::Total);
        assert_eq!(total.manhours, 20.0);
        assert_eq!(total.mandays, 2.5);
        assert_eq!(total.period, "4 working days");
    }

    #[test]
    fn test_build_table_rows_empty_summary() {
        let rows = build_table_rows(&Summary::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].manhours, 0.0);
    }

    // ── Render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_summary_table_shows_totals() {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let summary = make_summary();
        let mut state = TableState::default();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_summary_table(frame, area, &summary, &mut state, &theme);
            })
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Alpha"));
        assert!(text.contains("GRAND TOTAL"));
        assert!(text.contains("20.00"));
        assert!(text.contains("2.50"));
    }

    #[test]
    fn test_render_summary_table_tiny_area_does_not_panic() {
        let backend = TestBackend::new(10, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();
        let summary = make_summary();
        let mut state = TableState::default().with_selected(Some(3));

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_summary_table(frame, area, &summary, &mut state, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_no_data_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, &theme);
            })
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("No timesheet entries"));
    }
}
