use crate::themes::Theme;
use ratatui::text::{Line, Span};
use summary_core::formatting::{format_hours, format_mandays};
use summary_core::models::Summary;

/// Width of the `=` separator under the title.
pub const SEPARATOR_WIDTH: usize = 60;

/// Summary header rendering three lines:
///
/// 1. `TIMESHEET SUMMARY · <source>`
/// 2. A `=` separator.
/// 3. `[ N working days | H h | D md | months: ... ]`
pub struct Header<'a> {
    /// Name of the input file shown next to the title.
    pub source: &'a str,
    pub summary: &'a Summary,
    /// Human-readable month selection, e.g. `"all"` or `"2024-02, 2024-01"`.
    pub months: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, summary: &'a Summary, months: &'a str, theme: &'a Theme) -> Self {
        Self {
            source,
            summary,
            months,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let t = self.theme;
        vec![
            Line::from(vec![
                Span::styled("TIMESHEET SUMMARY", t.header),
                Span::styled(" · ", t.separator),
                Span::styled(self.source.to_string(), t.label),
            ]),
            Line::from(Span::styled("=".repeat(SEPARATOR_WIDTH), t.separator)),
            Line::from(vec![
                Span::styled("[ ", t.label),
                Span::styled(self.summary.total_working_days.to_string(), t.value),
                Span::styled(" working days | ", t.label),
                Span::styled(format_hours(self.summary.grand_total_manhours()), t.value),
                Span::styled(" h | ", t.label),
                Span::styled(format_mandays(self.summary.grand_total_mandays()), t.value),
                Span::styled(" md | months: ", t.label),
                Span::styled(self.months.to_string(), t.value),
                Span::styled(" ]", t.label),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
