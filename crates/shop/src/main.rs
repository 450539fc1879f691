use std::sync::Arc;

use prodmgr_infra::config::ENV_LOG_FORMAT;
use prodmgr_infra::{CatalogConfig, LogFormat, SystemClock};
use prodmgr_observability::LogOutput;

fn main() -> anyhow::Result<()> {
    // Logging comes up before the rest of the config so config warnings are seen.
    let log_format: LogFormat = std::env::var(ENV_LOG_FORMAT)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default();
    prodmgr_observability::init_with(match log_format {
        LogFormat::Json => LogOutput::Json,
        LogFormat::Pretty => LogOutput::Pretty,
    });

    let config = CatalogConfig::from_env()?;
    tracing::info!(
        locale = %config.locale,
        data = %config.data_folder.display(),
        reports = %config.report_folder.display(),
        "starting shop"
    );

    let summary = prodmgr_shop::app::run(&config, Arc::new(SystemClock))?;

    println!("{}", summary.listing);
    for (label, total) in &summary.discounts {
        println!("{label}\t{total}");
    }

    tracing::info!(
        seeded = summary.seeded,
        created = summary.created,
        reports = summary.reports_written,
        simulated = summary.simulated_reviews,
        simulation_errors = summary.simulation_errors,
        total_reviews = summary.total_reviews,
        "shop finished"
    );
    Ok(())
}
