//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_export_adapter::CsvExportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::config::{ReportConfig, SimulationConfig};
use crate::domain::error::TwapError;
use crate::domain::simulation::{run_simulation, SimulationReport};
use crate::domain::twap::RemainderPolicy;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "twapsim", about = "Synthetic TWAP execution simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a series, simulate TWAP execution and report cost metrics
    Simulate(SimulateArgs),
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct SimulateArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Number of records in the synthetic series
    #[arg(short = 'n', long)]
    pub records: Option<usize>,
    /// Number of TWAP slices
    #[arg(short = 't', long)]
    pub trades: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Treatment of records left over when trades do not divide records (exclude|absorb)
    #[arg(long)]
    pub remainder: Option<RemainderPolicy>,
    /// SVG chart output path
    #[arg(long)]
    pub chart: Option<PathBuf>,
    #[arg(long)]
    pub no_chart: bool,
    /// CSV export path for the series, VWAP and executions
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Also print bps figures, filled quantity and excluded records
    #[arg(long)]
    pub verbose_metrics: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate(args) => run_simulate(&args),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TwapError> {
    log::info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| TwapError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Layer defaults, the optional config file and CLI overrides, then validate.
pub fn resolve_config(args: &SimulateArgs) -> Result<(SimulationConfig, ReportConfig), TwapError> {
    let (mut config, mut report) = match &args.config {
        Some(path) => {
            let adapter = load_config(path)?;
            (
                SimulationConfig::from_config(&adapter)?,
                ReportConfig::from_config(&adapter),
            )
        }
        None => (SimulationConfig::default(), ReportConfig::default()),
    };

    if let Some(records) = args.records {
        config.series.records = records;
    }
    if let Some(trades) = args.trades {
        config.execution.num_trades = trades;
    }
    if let Some(seed) = args.seed {
        config.series.seed = seed;
    }
    if let Some(remainder) = args.remainder {
        config.execution.remainder = remainder;
    }
    if let Some(chart) = &args.chart {
        report.chart_path = Some(chart.clone());
    }
    if args.no_chart {
        report.chart_path = None;
    }
    if let Some(csv) = &args.csv {
        report.csv_path = Some(csv.clone());
    }

    config.validate()?;
    Ok((config, report))
}

/// Run the pipeline, print metrics to `out` and write every configured sink.
pub fn run_pipeline<W: Write>(
    config: &SimulationConfig,
    report_config: &ReportConfig,
    verbose_metrics: bool,
    out: &mut W,
) -> Result<SimulationReport, TwapError> {
    let report = run_simulation(config)?;

    let text = if verbose_metrics {
        report.metrics.render_detailed()
    } else {
        report.metrics.render()
    };
    out.write_all(text.as_bytes())?;
    out.flush()?;

    let sinks: [(Option<&PathBuf>, &dyn ReportPort); 2] = [
        (report_config.chart_path.as_ref(), &SvgChartAdapter),
        (report_config.csv_path.as_ref(), &CsvExportAdapter),
    ];
    for (path, sink) in sinks {
        if let Some(path) = path {
            sink.write(&report, path)?;
            log::info!("{} written to: {}", sink.name(), path.display());
        }
    }

    Ok(report)
}

fn run_simulate(args: &SimulateArgs) -> ExitCode {
    let (config, report_config) = match resolve_config(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let stdout = io::stdout();
    match run_pipeline(&config, &report_config, args.verbose_metrics, &mut stdout.lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    let args = SimulateArgs {
        config: Some(config_path.to_path_buf()),
        ..SimulateArgs::default()
    };
    let (config, report) = match resolve_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let series = &config.series;
    let execution = &config.execution;
    eprintln!("Series:");
    eprintln!("  records:       {}", series.records);
    eprintln!("  seed:          {}", series.seed);
    eprintln!("  start:         {}", series.start);
    eprintln!("  interval_secs: {}", series.interval_secs);
    eprintln!("  drift:         {}", series.drift);
    eprintln!("  volatility:    {}", series.volatility);
    eprintln!("  volume range:  [{}, {})", series.volume_min, series.volume_max);
    eprintln!("\nExecution:");
    eprintln!("  num_trades:    {}", execution.num_trades);
    eprintln!("  total_volume:  {}", execution.total_volume);
    eprintln!("  remainder:     {}", execution.remainder);

    let leftover = series.records % execution.num_trades;
    if leftover > 0 && execution.remainder == RemainderPolicy::Exclude {
        eprintln!(
            "  note: {} trailing records will be excluded from execution",
            leftover
        );
    }

    eprintln!("\nReport:");
    match &report.chart_path {
        Some(p) => eprintln!("  chart:         {}", p.display()),
        None => eprintln!("  chart:         (disabled)"),
    }
    if let Some(p) = &report.csv_path {
        eprintln!("  csv:           {}", p.display());
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
