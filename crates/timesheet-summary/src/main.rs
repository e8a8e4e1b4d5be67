mod bootstrap;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use summary_core::settings::Settings;
use summary_data::analysis::{select_projects, SummaryReport};
use summary_data::export::{export_summary, render_text};
use summary_data::reader::{load_entries, InputFormat};
use summary_ui::app::{App, ViewMode};

/// Where the `e` key writes when `--export` was not given.
fn default_export_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "timesheet".to_string());
    input.with_file_name(format!("{stem}_summary.xlsx"))
}

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Timesheet Summary v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, View: {}, Theme: {}",
        settings.input.display(),
        settings.view,
        settings.theme
    );

    settings.validate()?;

    let format: InputFormat = settings.format.parse()?;
    let entries = load_entries(&settings.input, format, settings.skip_rows)
        .with_context(|| format!("loading {}", settings.input.display()))?;

    let report = SummaryReport::with_months(entries, &settings.months);
    if !settings.months.is_empty() && report.selected_months().is_empty() {
        tracing::warn!(
            "None of the months {:?} occur in the input; showing all months",
            settings.months
        );
    }
    let summary = select_projects(report.summary(), &settings.projects);

    if let Some(path) = &settings.export {
        export_summary(&summary, path)?;
        tracing::info!("Exported summary to {}", path.display());
    }

    match settings.view.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "text" => {
            print!("{}", render_text(&summary));
        }
        view => {
            let source = settings
                .input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let export_path = settings
                .export
                .clone()
                .unwrap_or_else(|| default_export_path(&settings.input));

            let app = App::new(
                report,
                &settings.theme,
                ViewMode::from_name(view),
                source,
                export_path,
            )
            .with_project_filter(settings.projects.clone());
            app.run()?;
        }
    }

    Ok(())
}
