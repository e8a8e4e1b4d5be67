//! Application state and the terminal event loop.
//!
//! [`App`] owns the [`SummaryReport`] (raw rows plus month selection), the
//! active view and the theme. Every month toggle re-runs the aggregation over
//! the raw rows; views only ever see the resulting summary.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, TableState, Tabs},
    Frame, Terminal,
};
use tracing::{debug, info, warn};

use summary_core::models::Summary;
use summary_core::SummaryError;
use summary_data::analysis::{select_projects, DashboardStats, SummaryReport};
use summary_data::export::export_summary;

use crate::components::header::Header;
use crate::themes::Theme;
use crate::{dashboard_view, table_view, timeline_view};

/// Width of the month filter panel.
const MONTH_PANEL_WIDTH: u16 = 16;

// ── ViewMode ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Table,
    Timeline,
    Dashboard,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Table, ViewMode::Timeline, ViewMode::Dashboard];

    /// Parse a `--view` value. Non-interactive names fall back to the table.
    pub fn from_name(name: &str) -> Self {
        match name {
            "timeline" => Self::Timeline,
            "dashboard" => Self::Dashboard,
            _ => Self::Table,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Table => "Summary",
            Self::Timeline => "Timeline",
            Self::Dashboard => "Dashboard",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Table => 0,
            Self::Timeline => 1,
            Self::Dashboard => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

// ── Status line ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    /// File name shown in the header.
    pub source: String,
    pub report: SummaryReport,
    /// Projects to display; empty shows all.
    pub project_filter: Vec<String>,
    /// Target of the `e` key.
    pub export_path: PathBuf,
    pub month_cursor: usize,
    pub table_state: TableState,
    pub status: Option<StatusMessage>,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(
        report: SummaryReport,
        theme_name: &str,
        view_mode: ViewMode,
        source: String,
        export_path: PathBuf,
    ) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            source,
            report,
            project_filter: Vec::new(),
            export_path,
            month_cursor: 0,
            table_state: TableState::default(),
            status: None,
            should_quit: false,
        }
    }

    pub fn with_project_filter(mut self, projects: Vec<String>) -> Self {
        self.project_filter = projects;
        self
    }

    /// The summary after the project filter, as every view renders it.
    pub fn visible_summary(&self) -> Summary {
        select_projects(self.report.summary(), &self.project_filter)
    }

    /// `"all"` when unfiltered, otherwise the selected months newest first.
    pub fn months_label(&self) -> String {
        if self.report.is_filtered() {
            self.report.selected_months().join(", ")
        } else {
            "all".to_string()
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the interactive TUI until `q` or `Ctrl+C`.
    pub fn run(mut self) -> summary_core::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }
            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }
            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result.map_err(|e| SummaryError::Terminal(e.to_string()))
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.view_mode = self.view_mode.next(),
            KeyCode::Char('1') => self.view_mode = ViewMode::Table,
            KeyCode::Char('2') => self.view_mode = ViewMode::Timeline,
            KeyCode::Char('3') => self.view_mode = ViewMode::Dashboard,
            KeyCode::Up | KeyCode::Char('k') => {
                self.month_cursor = self.month_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.report.months().len().saturating_sub(1);
                self.month_cursor = (self.month_cursor + 1).min(last);
            }
            KeyCode::Char(' ') => self.toggle_month_at_cursor(),
            KeyCode::Char('a') => {
                self.report.select_all();
                self.after_filter_change();
            }
            KeyCode::Char('n') => {
                self.report.select_none();
                self.after_filter_change();
            }
            KeyCode::PageDown => self.table_state.scroll_down_by(10),
            KeyCode::PageUp => self.table_state.scroll_up_by(10),
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
    }

    fn toggle_month_at_cursor(&mut self) {
        let Some(month) = self.report.months().get(self.month_cursor).cloned() else {
            return;
        };
        self.report.toggle_month(&month);
        self.after_filter_change();
    }

    fn after_filter_change(&mut self) {
        *self.table_state.offset_mut() = 0;
        self.table_state.select(None);
        debug!(
            "Month selection now {} ({} projects)",
            self.months_label(),
            self.report.summary().projects.len()
        );
    }

    /// Write the visible summary to [`Self::export_path`].
    pub fn export(&mut self) {
        let summary = self.visible_summary();
        self.status = Some(match export_summary(&summary, &self.export_path) {
            Ok(()) => {
                info!("Exported summary to {}", self.export_path.display());
                StatusMessage {
                    text: format!("Exported to {}", self.export_path.display()),
                    is_error: false,
                }
            }
            Err(e) => {
                warn!("Export failed: {e}");
                StatusMessage {
                    text: e.to_string(),
                    is_error: true,
                }
            }
        });
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame) {
        let summary = self.visible_summary();
        let months = self.months_label();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let header = Header::new(&self.source, &summary, &months, &self.theme).to_lines();
        frame.render_widget(Paragraph::new(Text::from(header)), rows[0]);

        let tabs = Tabs::new(
            ViewMode::ALL
                .iter()
                .enumerate()
                .map(|(i, m)| format!("{} {}", i + 1, m.title())),
        )
        .select(self.view_mode.index())
        .style(self.theme.tab_inactive)
        .highlight_style(self.theme.tab_active);
        frame.render_widget(tabs, rows[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(MONTH_PANEL_WIDTH), Constraint::Min(10)])
            .split(rows[2]);
        self.render_month_panel(frame, body[0]);

        let area = body[1];
        match self.view_mode {
            ViewMode::Table if summary.is_empty() => {
                table_view::render_no_data(frame, area, &self.theme)
            }
            ViewMode::Table => table_view::render_summary_table(
                frame,
                area,
                &summary,
                &mut self.table_state,
                &self.theme,
            ),
            ViewMode::Timeline => {
                timeline_view::render_timeline_view(frame, area, &summary, &self.theme)
            }
            ViewMode::Dashboard => dashboard_view::render_dashboard_view(
                frame,
                area,
                &DashboardStats::from_summary(&summary),
                &self.theme,
            ),
        }

        frame.render_widget(Paragraph::new(self.footer_line()), rows[3]);
    }

    fn render_month_panel(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = if self.report.months().is_empty() {
            vec![Line::from(Span::styled("no dates", self.theme.dim))]
        } else {
            self.report
                .months()
                .iter()
                .enumerate()
                .map(|(i, month)| {
                    let selected = self.report.is_selected(month);
                    let mark = if selected { "[x] " } else { "[ ] " };
                    let mut style = if selected {
                        self.theme.month_selected
                    } else {
                        self.theme.text
                    };
                    if i == self.month_cursor {
                        style = style.patch(self.theme.cursor);
                    }
                    Line::from(Span::styled(format!("{mark}{month}"), style))
                })
                .collect()
        };
        frame.render_widget(
            Paragraph::new(Text::from(lines)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.table_border)
                    .title(" Months "),
            ),
            area,
        );
    }

    fn footer_line(&self) -> Line<'_> {
        match &self.status {
            Some(status) => Line::from(Span::styled(
                status.text.clone(),
                if status.is_error {
                    self.theme.error
                } else {
                    self.theme.success
                },
            )),
            None => Line::from(Span::styled(
                "tab/1-3 view · ↑↓ month · space toggle · a all · n none · e export · q quit",
                self.theme.dim,
            )),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use summary_core::models::RawEntry;
    use tempfile::TempDir;

    fn row(date: &str, hours: &str, project: &str, task: &str) -> RawEntry {
        RawEntry {
            date: date.to_string(),
            hours_worked_text: hours.to_string(),
            project_name: project.to_string(),
            task: task.to_string(),
            ..RawEntry::default()
        }
    }

    fn make_app(export_path: PathBuf) -> App {
        let rows = vec![
            row("02/01/2024", "8h 00m", "Alpha", "Build"),
            row("05/02/2024", "4h 00m", "Beta", "Design"),
            row("06/02/2024", "2h 00m", "Alpha", "Review"),
        ];
        App::new(
            SummaryReport::new(rows),
            "dark",
            ViewMode::Table,
            "sheet.csv".to_string(),
            export_path,
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn draw(app: &mut App, width: u16, height: u16) {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
    }

    // ── ViewMode ──────────────────────────────────────────────────────────────

    #[test]
    fn test_view_mode_from_name() {
        assert_eq!(ViewMode::from_name("table"), ViewMode::Table);
        assert_eq!(ViewMode::from_name("timeline"), ViewMode::Timeline);
        assert_eq!(ViewMode::from_name("dashboard"), ViewMode::Dashboard);
        assert_eq!(ViewMode::from_name("json"), ViewMode::Table);
    }

    #[test]
    fn test_view_mode_next_cycles() {
        assert_eq!(ViewMode::Table.next(), ViewMode::Timeline);
        assert_eq!(ViewMode::Timeline.next(), ViewMode::Dashboard);
        assert_eq!(ViewMode::Dashboard.next(), ViewMode::Table);
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_quit_keys() {
        let mut app = make_app(PathBuf::from("unused.xlsx"));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = make_app(PathBuf::from("unused.xlsx"));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_view_switch_keys() {
        let mut app = make_app(PathBuf::from("unused.xlsx"));
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.view_mode, ViewMode::Dashboard);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view_mode, ViewMode::Table);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.view_mode, ViewMode::Timeline);
    }

    #[test]
    fn test_month_toggle_reaggregates() {
        let mut app = make_app(PathBuf::from("unused.xlsx"));
        assert_eq!(app.report.months(), ["2024-02", "2024-01"]);
        assert_eq!(app.months_label(), "all");

        // Cursor starts on the newest month.
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.months_label(), "2024-02");
        let summary = app.visible_summary();
        assert_eq!(summary.grand_total_manhours(), 6.0);
        assert_eq!(summary.total_working_days, 2);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.months_label(), "all");
        assert_eq!(app.visible_summary().grand_total_manhours(), 14.0);
    }

    #[test]
    fn test_select_all_and_none() {
        let mut app = make_app(PathBuf::from("unused.xlsx"));
        press(&mut app, KeyCode::Char('a'));
        assert!(app.report.is_selected("2024-01"));
        assert!(app.report.is_selected("2024-02"));
        press(&mut app, KeyCode::Char('n'));
        assert!(app.report.selected_months().is_empty());
        assert_eq!(app.visible_summary().grand_total_manhours(), 14.0);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut app = make_app(PathBuf::from("unused.xlsx"));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.month_cursor, 0);
        for _ in 0..5 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.month_cursor, 1);
    }

    #[test]
    fn test_project_filter() {
        let app = make_app(PathBuf::from("unused.xlsx")).with_project_filter(vec!["Beta".into()]);
        assert_eq!(app.visible_summary().project_names(), vec!["Beta"]);
    }

    // ── Export ────────────────────────────────────────────────────────────────

    #[test]
    fn test_export_key_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.csv");
        let mut app = make_app(path.clone());

        press(&mut app, KeyCode::Char('e'));
        assert!(path.exists());
        assert!(!app.status.as_ref().unwrap().is_error);
    }

    #[test]
    fn test_export_bad_extension_reports_error() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(dir.path().join("summary.pdf"));
        press(&mut app, KeyCode::Char('e'));
        assert!(app.status.as_ref().unwrap().is_error);
    }

    // ── Render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_every_view_does_not_panic() {
        let mut app = make_app(PathBuf::from("unused.xlsx"));
        for mode in ViewMode::ALL {
            app.view_mode = mode;
            draw(&mut app, 120, 30);
        }
    }

    #[test]
    fn test_render_empty_report_does_not_panic() {
        let mut app = App::new(
            SummaryReport::new(Vec::new()),
            "classic",
            ViewMode::Table,
            "empty.csv".to_string(),
            PathBuf::from("unused.xlsx"),
        );
        draw(&mut app, 80, 24);
        app.view_mode = ViewMode::Timeline;
        draw(&mut app, 80, 24);
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let mut app = make_app(PathBuf::from("unused.xlsx"));
        app.view_mode = ViewMode::Dashboard;
        draw(&mut app, 20, 5);
    }
}
