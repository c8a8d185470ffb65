use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging to `feasweep.log` next to the sweep configuration.
///
/// The chart view owns the terminal, so nothing is ever logged to stdout.
/// The level can be overridden through `RUST_LOG`; returns the appender
/// guard, which must stay alive for the duration of the run.
pub fn init_logging(log_dir: &Path, level: &str) -> color_eyre::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let appender = tracing_appender::rolling::never(log_dir, "feasweep.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let default_filter = format!("feasweep={level},feasweep_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    tracing::info!("feasweep logging initialized (dir={})", log_dir.display());
    Ok(guard)
}
