//! Dashboard view: key figures, project ranking and top tasks.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use summary_core::formatting::{format_hours, format_mandays, format_number};
use summary_data::analysis::DashboardStats;

use crate::components::fit_width;
use crate::components::progress_bar::HoursBar;
use crate::themes::Theme;

const NAME_WIDTH: usize = 24;

/// The four headline figures as label/value pairs.
pub fn key_figures(stats: &DashboardStats) -> [(&'static str, String); 4] {
    [
        ("Total manhours", format_hours(stats.total_manhours)),
        ("Total mandays", format_mandays(stats.total_mandays)),
        ("Working days", stats.working_days.to_string()),
        ("Avg hours / day", format_number(stats.avg_hours_per_day, 2)),
    ]
}

fn figures_line<'a>(stats: &DashboardStats, theme: &'a Theme) -> Line<'a> {
    let mut spans = Vec::new();
    for (i, (label, value)) in key_figures(stats).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("   │   ", theme.separator));
        }
        spans.push(Span::styled(format!("{label}: "), theme.label));
        spans.push(Span::styled(value, theme.value));
    }
    Line::from(spans)
}

/// Lines of the project ranking panel, largest project first.
pub fn project_ranking_lines<'a>(
    stats: &DashboardStats,
    bar_width: u16,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let scale = stats
        .project_ranking
        .first()
        .map(|p| p.manhours)
        .unwrap_or(0.0);
    stats
        .project_ranking
        .iter()
        .map(|p| {
            let bar = HoursBar::new(p.manhours, scale, stats.total_manhours, theme)
                .with_width(bar_width)
                .to_line();
            let name = fit_width(&p.project_name, NAME_WIDTH);
            let mut spans = vec![Span::styled(name, theme.text)];
            spans.extend(bar.spans);
            Line::from(spans)
        })
        .collect()
}

/// Lines of the top-task panel as `task (project)` with an hours bar.
pub fn top_task_lines<'a>(
    stats: &DashboardStats,
    bar_width: u16,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let scale = stats.top_tasks.first().map(|t| t.manhours).unwrap_or(0.0);
    stats
        .top_tasks
        .iter()
        .map(|t| {
            let name = format!("{} ({})", t.task_name, t.project_name);
            let mut bar = HoursBar::new(t.manhours, scale, stats.total_manhours, theme)
                .with_width(bar_width);
            bar.config.show_share = false;
            let mut spans = vec![Span::styled(fit_width(&name, NAME_WIDTH), theme.text)];
            spans.extend(bar.to_line().spans);
            Line::from(spans)
        })
        .collect()
}

pub fn render_dashboard_view(frame: &mut Frame, area: Rect, stats: &DashboardStats, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let block = |title: &'static str| {
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.table_border)
            .title(title)
    };

    frame.render_widget(
        Paragraph::new(figures_line(stats, theme)).block(block(" Overview ")),
        chunks[0],
    );

    let bar_width = |panel: Rect| {
        panel
            .width
            .saturating_sub(2 + NAME_WIDTH as u16 + 22)
            .max(1)
    };

    frame.render_widget(
        Paragraph::new(Text::from(project_ranking_lines(
            stats,
            bar_width(panels[0]),
            theme,
        )))
        .block(block(" Projects by hours ")),
        panels[0],
    );
    frame.render_widget(
        Paragraph::new(Text::from(top_task_lines(stats, bar_width(panels[1]), theme)))
            .block(block(" Top tasks ")),
        panels[1],
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
