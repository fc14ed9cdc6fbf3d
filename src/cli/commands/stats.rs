//! Statistics command.

use anyhow::{Context, Result};
use quantfolio_analytics::StatisticsReport;
use quantfolio_config::AppConfig;
use quantfolio_monitor::status_line;
use tracing::{info, warn};

use super::{controller, static_loader};
use crate::cli::{OutputFormat, StatsArgs};

pub async fn run(args: StatsArgs, config: &AppConfig) -> Result<()> {
    let mut options = config.session_options();
    options.parallel |= args.source.parallel;

    let mut session = controller(config, static_loader(config, &args.source), options);
    if args.sample {
        session.seed_fallback();
    } else {
        session.load_static().await;
    }

    let view = session.state().view();
    if let Some(notice) = &view.error {
        warn!(notice = %notice, "statistics computed on incomplete or sample data");
    }

    let report = StatisticsReport::from_table(&view.data)
        .context("Cannot compute statistics for the loaded data")?;

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Csv => print!("{}", report.covariance_to_csv()),
        OutputFormat::Text => {
            println!("{}", status_line(&view));
            println!();
            println!("{}", report.summary());
        }
    }

    if let Some(path) = &args.save {
        std::fs::write(path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "report saved");
    }

    Ok(())
}
