use crate::themes::Theme;
use ratatui::text::{Line, Span};
use summary_core::formatting::{format_hours, percentage};

/// Visual configuration of a bar.
pub struct BarConfig {
    /// Width in columns of the bar portion (excluding the label).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
    /// Append the share of the total after the hours.
    pub show_share: bool,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            width: 30,
            filled_char: '\u{2588}', // █
            empty_char: '\u{2591}',  // ░
            show_share: true,
        }
    }
}

// ── HoursBar ──────────────────────────────────────────────────────────────────

/// Horizontal bar for a number of hours.
///
/// The fill is scaled against `scale_hours` (usually the largest entry in the
/// list so the leader spans the full width); the share label is computed
/// against `total_hours`.
pub struct HoursBar<'a> {
    pub hours: f64,
    pub scale_hours: f64,
    pub total_hours: f64,
    pub theme: &'a Theme,
    pub config: BarConfig,
}

impl<'a> HoursBar<'a> {
    pub fn new(hours: f64, scale_hours: f64, total_hours: f64, theme: &'a Theme) -> Self {
        Self {
            hours,
            scale_hours,
            total_hours,
            theme,
            config: BarConfig::default(),
        }
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    /// Share of `total_hours`, in percent with one decimal.
    pub fn share(&self) -> f64 {
        percentage(self.hours, self.total_hours, 1)
    }

    /// Number of filled columns.
    pub fn filled(&self) -> u16 {
        if self.scale_hours <= 0.0 {
            return 0;
        }
        let ratio = (self.hours / self.scale_hours).clamp(0.0, 1.0);
        let filled = (ratio * f64::from(self.config.width)).round() as u16;
        // Any non-zero entry stays visible.
        if filled == 0 && self.hours > 0.0 {
            1.min(self.config.width)
        } else {
            filled
        }
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = self.filled();
        let empty = self.config.width.saturating_sub(filled);
        let share = self.share();

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        let label = if self.config.show_share {
            format!(" {} h ({:.1}%)", format_hours(self.hours), share)
        } else {
            format!(" {} h", format_hours(self.hours))
        };

        Line::from(vec![
            Span::styled(filled_str, self.theme.share_style(share)),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(label, self.theme.label),
        ])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
