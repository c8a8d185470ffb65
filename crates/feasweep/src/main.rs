use std::path::{Path, PathBuf};

use clap::Parser;

mod app;
mod backend;
mod chart;
mod config_file;
mod logging;
mod report;

use app::App;
use backend::BackendKind;
use chart::ChartView;
use feasweep_core::sweep::{ProgressCallback, run_sweep};

#[derive(Parser, Debug)]
#[command(name = "feasweep")]
#[command(about = "Parameter sweeps over a parametric CAD model with FEA result harvesting")]
struct Args {
    /// Path to the sweep configuration (YAML)
    config: PathBuf,

    /// Which CAD/FEA backend to drive
    #[arg(long, value_enum, default_value = "freecad")]
    backend: BackendKind,

    /// FreeCAD console executable (default: FreeCADCmd on PATH)
    #[arg(long)]
    freecad_path: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print the result table only; skip the chart view
    #[arg(long)]
    no_chart: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config = config_file::load_config(&args.config)?;

    let log_dir = args
        .config
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let _log_guard = logging::init_logging(log_dir, &args.log_level)?;

    tracing::info!(
        document = %config.document.display(),
        parameters = config.parameters.len(),
        outputs = config.outputs.len(),
        "starting sweep"
    );

    let mut backend = backend::build(args.backend, args.freecad_path.as_deref(), &config)?;
    let progress: ProgressCallback = Box::new(|completed, total, record| {
        tracing::info!(
            point = record.index,
            completed,
            total,
            solved = record.is_solved(),
            runtime_ms = record.runtime.as_millis() as u64,
            "sweep point finished"
        );
    });

    let table = run_sweep(backend.as_mut(), &config, Some(progress))?;
    tracing::info!(rows = table.len(), failed = table.failed_count(), "sweep complete");

    println!("{}", report::render_table(&table));
    if table.failed_count() > 0 {
        println!(
            "{} of {} sweep points failed to solve (details in feasweep.log)",
            table.failed_count(),
            table.len()
        );
    }

    if !args.no_chart {
        let mut app = App::new(ChartView::from_table(&table, &config));
        ratatui::run(|terminal| app.run(terminal))?;

        if let Err(err) = ratatui::try_restore() {
            tracing::error!("Failed to restore terminal: {err}");
        }
    }

    Ok(())
}
