mod bootstrap;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use heartchart_core::settings::Settings;
use heartchart_core::time_utils::TimezoneHandler;
use heartchart_data::analysis::PipelineOptions;
use heartchart_render::{render_document, RenderOptions, Theme};
use heartchart_runtime::orchestrator::ChartJob;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    run(&settings).await
}

/// Chart the configured inputs. With no inputs, print usage and succeed.
async fn run(settings: &Settings) -> Result<()> {
    if settings.files.is_empty() {
        Settings::print_usage().context("Failed to print usage")?;
        return Ok(());
    }

    tracing::info!("heartchart v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Timezone: {}, Theme: {}, Inputs: {}",
        settings.timezone,
        settings.theme,
        settings.files.len()
    );

    let options = PipelineOptions {
        window: settings.time_window()?,
        smooth_seconds: settings.smooth,
    };

    let report = ChartJob::new(
        settings.files.clone(),
        TimezoneHandler::new(&settings.timezone),
    )
    .with_options(options)
    .with_cache(settings.cache.clone())
    .run()
    .await
    .context("Failed to build charts")?;

    tracing::info!(
        "Charted {} of {} samples over {} day(s) from {} file(s)",
        report.chart.stats.charted,
        report.chart.stats.merged,
        report.chart.stats.days,
        report.files.len()
    );

    let render_options = RenderOptions {
        title: settings.title.clone(),
        width: settings.width,
        height: settings.height,
        theme: Theme::from_name(&settings.theme),
    };
    let html = render_document(&report.chart.days, &report.chart.bounds, &render_options);

    emit(settings.output.as_deref(), &html)
}

/// Write the document to `output`, or to stdout when no path was given.
fn emit(output: Option<&Path>, html: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
