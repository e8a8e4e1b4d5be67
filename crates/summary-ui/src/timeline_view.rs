//! Project timeline view.
//!
//! One lane per project. Each activity range is drawn as a bar inside a
//! calendar window spanning every project's dates plus a little padding.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use summary_core::formatting::{format_date, format_period};
use summary_core::models::Summary;
use summary_core::time_utils::TimelineWindow;

use crate::components::fit_width;
use crate::themes::Theme;

/// Columns reserved for the project name.
pub const LABEL_WIDTH: usize = 18;
/// Columns reserved for the `"dd Mon yy – dd Mon yy"` suffix.
const PERIOD_WIDTH: usize = 22;

const BAR_CHAR: char = '█';
const AXIS_CHAR: char = '·';

/// Build the timeline for `summary` at `width` columns (inside the border).
pub fn build_timeline_lines<'a>(
    summary: &Summary,
    width: u16,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let Some(window) = TimelineWindow::from_projects(&summary.projects) else {
        return vec![Line::from(Span::styled(
            "No dated activity to plot",
            theme.dim,
        ))];
    };

    let bar_width = (width as usize).saturating_sub(LABEL_WIDTH + PERIOD_WIDTH + 2);
    let mut lines = Vec::with_capacity(summary.projects.len() + 2);

    // Window edges above the lanes.
    let start_label = format_date(Some(window.start));
    let end_label = format_date(Some(window.end));
    let gap = bar_width.saturating_sub(start_label.len() + end_label.len());
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH + 1)),
        Span::styled(start_label, theme.label),
        Span::raw(" ".repeat(gap)),
        Span::styled(end_label, theme.label),
    ]));

    for (index, project) in summary.projects.iter().enumerate() {
        let lane_style = theme.lane_style(index, project.is_leave());
        let mut spans = vec![
            Span::styled(fit_width(&project.project_name, LABEL_WIDTH), theme.text),
            Span::raw(" "),
        ];

        if project.date_ranges.is_empty() {
            spans.push(Span::styled(
                fit_width("no dated activity", bar_width),
                theme.dim,
            ));
        } else {
            let mut cells = vec![false; bar_width];
            for range in &project.date_ranges {
                let (first, len) = window.columns(range, bar_width as u16);
                for cell in cells.iter_mut().skip(first as usize).take(len as usize) {
                    *cell = true;
                }
            }
            spans.extend(run_spans(&cells, lane_style, theme));
        }

        let period = format_period(project.start_date, project.end_date);
        if !period.is_empty() {
            spans.push(Span::styled(format!(" {period}"), theme.dim));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{} days shown", window.total_days() + 1),
        theme.dim,
    )));
    lines
}

/// Collapse a row of on/off cells into alternating bar and axis spans.
fn run_spans<'a>(cells: &[bool], bar: ratatui::style::Style, theme: &Theme) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let mut iter = cells.iter().peekable();
    while let Some(&on) = iter.next() {
        let mut len = 1;
        while iter.peek().is_some_and(|&&next| next == on) {
            iter.next();
            len += 1;
        }
        let (ch, style) = if on {
            (BAR_CHAR, bar)
        } else {
            (AXIS_CHAR, theme.timeline_axis)
        };
        spans.push(Span::styled(std::iter::repeat_n(ch, len).collect::<String>(), style));
    }
    spans
}

pub fn render_timeline_view(frame: &mut Frame, area: Rect, summary: &Summary, theme: &Theme) {
    let inner_width = area.width.saturating_sub(2);
    let lines = build_timeline_lines(summary, inner_width, theme);
    let paragraph = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.table_border)
            .title(" Timeline "),
    );
    frame.render_widget(paragraph, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
