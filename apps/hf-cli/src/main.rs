use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use hf_app::{
    AppError, AppResult, EngineSettings, RunProgressEvent, RunRequest, RunResponse, RunStage,
    network_service, run_service,
};
use hf_engine::{EngineSelection, ExternalEngineConfig};
use hf_network::{RunOptions, TimeStep};
use hf_results::Stat;
use hf_sim::CancelToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hydroflow")]
#[command(about = "HydroFlow CLI - Water distribution network simulation tool", long_about = None)]
struct Cli {
    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a network file
    Validate {
        /// Network file (.yaml, .yml, .json or .inp)
        network: PathBuf,
    },
    /// Print component counts and totals
    Summary {
        network: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write the network description in INP format
    Describe {
        network: PathBuf,
        #[command(flatten)]
        period: PeriodArgs,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run an extended-period simulation
    Run {
        network: PathBuf,
        #[command(flatten)]
        period: PeriodArgs,
        /// Engine order: auto, internal, or external
        #[arg(long, default_value = "auto")]
        engine: EngineSelection,
        /// External engine executable (defaults to $HYDROFLOW_EPANET)
        #[arg(long)]
        epanet: Option<PathBuf>,
        /// External engine timeout in seconds
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,
        /// Keep the external engine's work directory
        #[arg(long)]
        keep_workdir: bool,
        /// Write results JSON here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct PeriodArgs {
    /// Simulated duration in hours
    #[arg(long, default_value_t = 24)]
    duration: u32,
    /// Time step in hours: 0.5, 1, 2 or 6
    #[arg(long, default_value = "1", value_parser = parse_time_step)]
    time_step: TimeStep,
    /// Scale demands by the daily pattern
    #[arg(long)]
    pattern: bool,
}

impl PeriodArgs {
    fn options(&self) -> RunOptions {
        RunOptions {
            duration_hours: self.duration,
            time_step: self.time_step,
            use_demand_pattern: self.pattern,
        }
    }
}

fn parse_time_step(s: &str) -> Result<TimeStep, String> {
    let hours: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    TimeStep::from_hours(hours).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Validate { network } => cmd_validate(&network),
        Commands::Summary { network, json } => cmd_summary(&network, json),
        Commands::Describe {
            network,
            period,
            output,
        } => cmd_describe(&network, &period.options(), output.as_deref()),
        Commands::Run {
            network,
            period,
            engine,
            epanet,
            timeout_secs,
            keep_workdir,
            output,
        } => {
            let external = epanet
                .map(ExternalEngineConfig::new)
                .or_else(ExternalEngineConfig::from_env)
                .map(|c| {
                    c.with_timeout(Duration::from_secs(timeout_secs))
                        .keep_workdir(keep_workdir)
                });
            let engines = EngineSettings {
                selection: engine,
                external,
                ..EngineSettings::default()
            };
            cmd_run(&network, period.options(), engines, output.as_deref())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn report_error(e: &AppError) {
    debug!(error = ?e, "command failed");
    eprintln!("✗ {e}");
    eprintln!("  kind: {}", e.kind());
    if let Some(step) = e.step() {
        eprintln!("  step: {step}");
    }
    let ids = e.offending_ids();
    if !ids.is_empty() {
        eprintln!("  ids: {}", ids.join(", "));
    }
}

fn cmd_validate(path: &Path) -> AppResult<()> {
    println!("Validating network: {}", path.display());
    let records = network_service::load_network(path)?;
    network_service::validate_network(&records)?;
    println!("✓ Network is valid");
    Ok(())
}

fn cmd_summary(path: &Path, json: bool) -> AppResult<()> {
    let records = network_service::load_network(path)?;
    let summary = network_service::summarize_network(&records)?;
    if json {
        let text = serde_json::to_string_pretty(&summary)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }
    println!("Network: {}", path.display());
    println!("  Junctions:  {}", summary.junctions);
    println!("  Reservoirs: {}", summary.reservoirs);
    println!("  Tanks:      {}", summary.tanks);
    println!("  Pipes:      {}", summary.pipes);
    println!("  Pumps:      {}", summary.pumps);
    println!("  Valves:     {}", summary.valves);
    println!("  Total pipe length:  {:.1} m", summary.total_pipe_length_m);
    println!("  Mean pipe diameter: {:.1} mm", summary.mean_pipe_diameter_mm);
    println!("  Total base demand:  {:.4} m³/s", summary.total_base_demand_m3s);
    Ok(())
}

fn cmd_describe(path: &Path, options: &RunOptions, output: Option<&Path>) -> AppResult<()> {
    let records = network_service::load_network(path)?;
    let text = network_service::build_description(&records, options)?;
    match output {
        Some(out) => {
            std::fs::write(out, text)?;
            println!("✓ Description written to {}", out.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn cmd_run(
    path: &Path,
    options: RunOptions,
    engines: EngineSettings,
    output: Option<&Path>,
) -> AppResult<()> {
    println!(
        "Running {} h at {} h steps: {}",
        options.duration_hours,
        options.time_step.hours(),
        path.display()
    );
    info!(
        engine = %engines.selection,
        external = ?engines.external.as_ref().map(|c| c.executable.display().to_string()),
        "engine settings"
    );
    let records = network_service::load_network(path)?;
    let request = RunRequest {
        records: &records,
        options,
        engines,
    };

    let mut last_emit = Instant::now();
    let mut last_fraction = -1.0f64;
    let response = run_service::run_with_progress(
        &request,
        &CancelToken::new(),
        Some(&mut |event| {
            let fraction = event
                .step
                .as_ref()
                .map(|s| s.fraction_complete)
                .unwrap_or(-1.0);
            let emit_now = fraction < 0.0
                || (fraction - last_fraction).abs() >= 0.01
                || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                if fraction >= 0.0 {
                    last_fraction = fraction;
                }
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    print_run_summary(&response);
    if let Some(out) = output {
        run_service::save_results(out, &response.results)?;
        println!("✓ Results written to {}", out.display());
    }
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match &event.stage {
        RunStage::RunningEngine { engine } => {
            if let Some(s) = &event.step {
                let width = 28usize;
                let filled = ((s.fraction_complete * width as f64).round() as usize).min(width);
                let bar = format!(
                    "{}{}",
                    "#".repeat(filled),
                    "-".repeat(width.saturating_sub(filled))
                );
                print!(
                    "\r[{}] {:>6.2}%  engine={}  t={:.1}h  step={}/{}  elapsed={:.1}s",
                    bar,
                    s.fraction_complete * 100.0,
                    engine,
                    s.sim_hours,
                    s.step,
                    s.total_steps,
                    event.elapsed_wall_s,
                );
                let _ = io::stdout().flush();
            }
        }
        RunStage::FallingBack { from, reason } => {
            clear_progress_line();
            println!("! {from} engine unavailable ({reason}), falling back");
        }
        _ => {}
    }
}

fn print_stat(name: &str, unit: &str, stat: &Stat) {
    println!(
        "  {:<9} min {:>10.4}  avg {:>10.4}  max {:>10.4} {}",
        name, stat.min, stat.avg, stat.max, unit
    );
}

fn print_run_summary(response: &RunResponse) {
    let results = &response.results;
    println!(
        "✓ Simulation completed with the {} engine: {} steps",
        results.engine,
        results.time_steps.len()
    );
    print_stat("Pressure", "m", &results.stats.pressure);
    print_stat("Flow", "m³/s", &results.stats.flow);
    print_stat("Velocity", "m/s", &results.stats.velocity);
    for (id, status) in &results.tanks.status {
        if let Some(last) = status.last() {
            println!("  Tank {id}: {last} at end of run");
        }
    }
    println!(
        "  Timing: build {:.3}s, solve {:.3}s, total {:.3}s",
        response.timing.build_time_s, response.timing.solve_time_s, response.timing.total_time_s
    );
}
