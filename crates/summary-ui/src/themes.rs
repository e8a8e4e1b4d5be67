use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Read the terminal background from `COLORFGBG` (`"fg;bg"`).
///
/// Background values 0–6 are dark, 7–15 light. Anything else is treated as
/// dark.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|val| val.split(';').next_back()?.parse::<u8>().ok())
        .map(|bg| {
            if bg <= 6 {
                BackgroundType::Dark
            } else {
                BackgroundType::Light
            }
        })
        .unwrap_or(BackgroundType::Dark)
}

/// Styles for every summary view.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub error: Style,

    // ── Tabs / filter panel ──────────────────────────────────────────────────
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub cursor: Style,
    pub month_selected: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_project: Style,
    pub table_task: Style,
    pub table_total: Style,
    /// Rows of the Leave project.
    pub leave: Style,

    // ── Bars ─────────────────────────────────────────────────────────────────
    /// Share below 15 %.
    pub bar_low: Style,
    /// Share between 15 % and 40 %.
    pub bar_medium: Style,
    /// Share at or above 40 %.
    pub bar_high: Style,
    pub bar_empty: Style,
    pub timeline_axis: Style,
    /// Colours cycled across timeline lanes.
    pub lane_palette: Vec<Color>,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            tab_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            month_selected: Style::default().fg(Color::Green),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_project: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            table_task: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            leave: Style::default().fg(Color::Magenta),

            bar_low: Style::default().fg(Color::Green),
            bar_medium: Style::default().fg(Color::Cyan),
            bar_high: Style::default().fg(Color::Yellow),
            bar_empty: Style::default().fg(Color::DarkGray),
            timeline_axis: Style::default().fg(Color::DarkGray),
            lane_palette: vec![
                Color::Cyan,
                Color::Green,
                Color::Yellow,
                Color::Blue,
                Color::LightRed,
                Color::LightMagenta,
            ],
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            tab_active: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            month_selected: Style::default().fg(Color::Green),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_project: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            table_task: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            leave: Style::default().fg(Color::Magenta),

            bar_low: Style::default().fg(Color::Green),
            bar_medium: Style::default().fg(Color::Blue),
            bar_high: Style::default().fg(Color::Red),
            bar_empty: Style::default().fg(Color::Gray),
            timeline_axis: Style::default().fg(Color::Gray),
            lane_palette: vec![
                Color::Blue,
                Color::Green,
                Color::Magenta,
                Color::Red,
                Color::Cyan,
                Color::DarkGray,
            ],
        }
    }

    /// Basic 8-colour ANSI palette, no bold.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            error: Style::default().fg(Color::Red),

            tab_active: Style::default().fg(Color::Black).bg(Color::White),
            tab_inactive: Style::default().fg(Color::Gray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            month_selected: Style::default().fg(Color::Green),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_project: Style::default().fg(Color::White),
            table_task: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),
            leave: Style::default().fg(Color::Magenta),

            bar_low: Style::default().fg(Color::Green),
            bar_medium: Style::default().fg(Color::Cyan),
            bar_high: Style::default().fg(Color::Yellow),
            bar_empty: Style::default().fg(Color::DarkGray),
            timeline_axis: Style::default().fg(Color::DarkGray),
            lane_palette: vec![Color::Cyan, Color::Green, Color::Yellow, Color::Magenta],
        }
    }

    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names (including `"auto"`) detect.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Bar fill style for a share of the total hours, in percent.
    pub fn share_style(&self, percentage: f64) -> Style {
        if percentage >= 40.0 {
            self.bar_high
        } else if percentage >= 15.0 {
            self.bar_medium
        } else {
            self.bar_low
        }
    }

    /// Colour of the `index`-th timeline lane. The Leave lane has its own.
    pub fn lane_style(&self, index: usize, is_leave: bool) -> Style {
        if is_leave {
            return self.leave;
        }
        match self.lane_palette.get(index % self.lane_palette.len().max(1)) {
            Some(color) => Style::default().fg(*color),
            None => self.text,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.table_total.fg, Some(Color::Yellow));
        assert_eq!(t.leave.fg, Some(Color::Magenta));
        assert!(!t.lane_palette.is_empty());
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.table_project.fg, Some(Color::Black));
    }

    #[test]
    fn test_classic_theme_has_no_bold() {
        let t = Theme::classic();
        assert!(!t.header.add_modifier.contains(Modifier::BOLD));
        assert!(!t.table_total.add_modifier.contains(Modifier::BOLD));
        assert!(!t.error.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("light").header.fg, Some(Color::Blue));
        assert!(Theme::from_name("does-not-exist").header.fg.is_some());
    }

    #[test]
    fn test_share_style_thresholds() {
        let t = Theme::dark();
        assert_eq!(t.share_style(0.0).fg, Some(Color::Green));
        assert_eq!(t.share_style(14.9).fg, Some(Color::Green));
        assert_eq!(t.share_style(15.0).fg, Some(Color::Cyan));
        assert_eq!(t.share_style(39.9).fg, Some(Color::Cyan));
        assert_eq!(t.share_style(40.0).fg, Some(Color::Yellow));
    }

    #[test]
    fn test_lane_style_cycles_and_marks_leave() {
        let t = Theme::dark();
        let n = t.lane_palette.len();
        assert_eq!(t.lane_style(0, false), t.lane_style(n, false));
        assert_eq!(t.lane_style(3, true), t.leave);
    }
}
