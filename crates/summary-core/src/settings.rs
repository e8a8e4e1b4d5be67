use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::SummaryError;

/// Number of leading rows timesheet exports carry before the header row.
pub const DEFAULT_SKIP_ROWS: usize = 4;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Summarise timesheet exports into per-project and per-task effort
#[derive(Parser, Debug, Clone)]
#[command(
    name = "timesheet-summary",
    about = "Summarise timesheet exports into per-project and per-task effort",
    version
)]
pub struct Settings {
    /// Timesheet export to read (.xlsx, .csv or .json)
    pub input: PathBuf,

    /// Input format (detected from the file extension when "auto")
    #[arg(long, default_value = "auto", value_parser = ["auto", "xlsx", "csv", "json"])]
    pub format: String,

    /// Leading rows before the header row in CSV exports
    #[arg(long, default_value_t = DEFAULT_SKIP_ROWS)]
    pub skip_rows: usize,

    /// Only include rows from this month (YYYY-MM); repeatable
    #[arg(long = "month", value_name = "YYYY-MM", value_parser = parse_month_arg)]
    pub months: Vec<String>,

    /// Only show this project; repeatable
    #[arg(long = "project", value_name = "NAME")]
    pub projects: Vec<String>,

    /// View to open
    #[arg(long, default_value = "table", value_parser = ["table", "timeline", "dashboard", "json", "text"])]
    pub view: String,

    /// Write the summary to a spreadsheet (.xlsx or .csv)
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

/// Validate a `--month` value as `YYYY-MM`.
fn parse_month_arg(value: &str) -> Result<String, String> {
    let valid = value.len() == 7
        && value.as_bytes()[4] == b'-'
        && value
            .bytes()
            .enumerate()
            .all(|(i, b)| i == 4 || b.is_ascii_digit())
        && matches!(value[5..].parse::<u32>(), Ok(1..=12));
    if valid {
        Ok(value.to_string())
    } else {
        Err(format!("expected a month as YYYY-MM, got \"{}\"", value))
    }
}

impl Settings {
    /// Reject option combinations that would only fail after loading input.
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(path) = &self.export {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase);
            if !matches!(ext.as_deref(), Some("xlsx" | "csv")) {
                return Err(SummaryError::Config(format!(
                    "--export must end in .xlsx or .csv, got {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Whether the run should open the interactive terminal UI.
    pub fn is_interactive(&self) -> bool {
        matches!(self.view.as_str(), "table" | "timeline" | "dashboard")
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.timesheet-summary/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_rows: Option<usize>,
}

impl LastUsedParams {
    /// Default path of the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// The config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".timesheet-summary").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Self::load_with_last_used`] with an explicit argument list
    /// and config path.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        // clap ids use the field name, not the flag spelling.
        if !is_arg_explicitly_set(&matches, "skip_rows") {
            if let Some(v) = last.skip_rows {
                settings.skip_rows = v;
            }
        }

        settings = Self::apply_debug(settings);

        let _ = LastUsedParams::from(&settings).save_to(config_path);

        settings
    }

    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            // One-shot outputs (json/text) are not remembered.
            view: s.is_interactive().then(|| s.view.clone()),
            skip_rows: Some(s.skip_rows),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            view: Some("timeline".to_string()),
            skip_rows: Some(2),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.theme, Some("dark".to_string()));
        assert_eq!(loaded.view, Some("timeline".to_string()));
        assert_eq!(loaded.skip_rows, Some(2));
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams::default().save_to(&path).expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    #[test]
    fn test_last_used_params_default_when_missing_or_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        assert!(LastUsedParams::load_from(&path).theme.is_none());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(LastUsedParams::load_from(&path).view.is_none());
    }

    // ── CLI parsing ───────────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["timesheet-summary", "sheet.csv"]);

        assert_eq!(settings.input, PathBuf::from("sheet.csv"));
        assert_eq!(settings.format, "auto");
        assert_eq!(settings.skip_rows, DEFAULT_SKIP_ROWS);
        assert!(settings.months.is_empty());
        assert!(settings.projects.is_empty());
        assert_eq!(settings.view, "table");
        assert!(settings.export.is_none());
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
        assert!(settings.is_interactive());
    }

    #[test]
    fn test_settings_repeatable_filters() {
        let settings = Settings::parse_from([
            "timesheet-summary",
            "sheet.csv",
            "--month",
            "2024-01",
            "--month",
            "2024-02",
            "--project",
            "Alpha",
        ]);
        assert_eq!(settings.months, vec!["2024-01", "2024-02"]);
        assert_eq!(settings.projects, vec!["Alpha"]);
    }

    #[test]
    fn test_settings_rejects_bad_month() {
        let result =
            Settings::try_parse_from(["timesheet-summary", "sheet.csv", "--month", "01/2024"]);
        assert!(result.is_err());
        let result =
            Settings::try_parse_from(["timesheet-summary", "sheet.csv", "--month", "2024-13"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_non_interactive_views() {
        let json = Settings::parse_from(["timesheet-summary", "s.csv", "--view", "json"]);
        assert!(!json.is_interactive());
        let text = Settings::parse_from(["timesheet-summary", "s.csv", "--view", "text"]);
        assert!(!text.is_interactive());
    }

    #[test]
    fn test_settings_export_path() {
        let settings =
            Settings::parse_from(["timesheet-summary", "s.csv", "--export", "/tmp/out.xlsx"]);
        assert_eq!(settings.export, Some(PathBuf::from("/tmp/out.xlsx")));
    }

    // ── load_with_last_used ───────────────────────────────────────────────────

    #[test]
    fn test_settings_format_values() {
        let xlsx = Settings::parse_from(["timesheet-summary", "s.xlsx", "--format", "xlsx"]);
        assert_eq!(xlsx.format, "xlsx");
        assert!(Settings::try_parse_from(["timesheet-summary", "s.ods", "--format", "ods"]).is_err());
    }

    #[test]
    fn test_validate_export_extension() {
        let ok = Settings::parse_from(["timesheet-summary", "s.csv", "--export", "out.XLSX"]);
        assert!(ok.validate().is_ok());
        let none = Settings::parse_from(["timesheet-summary", "s.csv"]);
        assert!(none.validate().is_ok());

        let bad = Settings::parse_from(["timesheet-summary", "s.csv", "--export", "out.pdf"]);
        let err = bad.validate().unwrap_err();
        assert!(matches!(err, SummaryError::Config(_)));
        assert!(err.to_string().contains("out.pdf"));
    }

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            view: Some("dashboard".to_string()),
            skip_rows: Some(0),
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["timesheet-summary".into(), "s.csv".into()],
            &config_path,
        );
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.view, "dashboard");
        assert_eq!(settings.skip_rows, 0);
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            skip_rows: Some(0),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec![
                "timesheet-summary".into(),
                "s.csv".into(),
                "--theme".into(),
                "light".into(),
                "--skip-rows".into(),
                "7".into(),
            ],
            &config_path,
        );
        assert_eq!(settings.theme, "light");
        assert_eq!(settings.skip_rows, 7);
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams::default()
            .save_to(&config_path)
            .expect("save");

        Settings::load_with_last_used_impl(
            vec!["timesheet-summary".into(), "s.csv".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = Settings::load_with_last_used_impl(
            vec!["timesheet-summary".into(), "s.csv".into(), "--debug".into()],
            &tmp_config_path(&tmp),
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec![
                "timesheet-summary".into(),
                "s.csv".into(),
                "--view".into(),
                "timeline".into(),
            ],
            &config_path,
        );

        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.view, Some("timeline".to_string()));
        assert_eq!(loaded.skip_rows, Some(DEFAULT_SKIP_ROWS));
    }
}
