//! procwatch - one-shot process watch-list monitor.
//!
//! Takes one process listing, checks every watched process and prints one
//! `<metricId>|<value>|<objectLabel>` line per enabled metric.
//!
//! Usage:
//!   procwatch "1,1,1,1,1" "ssh service;/usr/sbin/sshd#1,node service;/usr/local/bin/node#3"
//!   procwatch --snapshot-file ps.txt "1,0,0,0,0" "web;nginx#5"
//!
//! Exit status: 0 on success, 1 on malformed input, 30 when the process
//! listing cannot be obtained.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use procwatch::collector::{DEFAULT_PS_COMMAND, PsCommand, SnapshotFile, SnapshotSource};
use procwatch::config::{MonitorConfig, ObjectLabel};
use procwatch::metrics::{MetricRecord, MetricTable};
use procwatch::monitor::{EXIT_CONFIGURATION, Monitor, MonitorError};
use procwatch::report::Reporter;
use procwatch::util::program_name;

/// One-shot process watch-list monitor.
#[derive(Parser, Debug)]
#[command(name = "procwatch", about = "Process watch-list monitor", version)]
struct Args {
    /// Comma-separated 0/1 flags, ordered STATUS,VM_MEM,PH_MEM,MEM_US,CPU_US.
    #[arg(value_name = "METRIC_STATE")]
    metric_state: String,

    /// Watch list: `label;path#count` records separated by commas.
    #[arg(value_name = "PROCESSES")]
    processes: String,

    /// Command producing the process listing.
    #[arg(
        long,
        env = "PROCWATCH_PS_COMMAND",
        default_value = DEFAULT_PS_COMMAND,
        value_parser = PsCommand::from_command_line
    )]
    ps_command: PsCommand,

    /// Read a captured listing from this file instead of running the command.
    #[arg(long, value_name = "PATH")]
    snapshot_file: Option<PathBuf>,

    /// Rows containing this name are never matched.
    /// Default: the file name this program was invoked as.
    #[arg(long, value_name = "NAME")]
    self_name: Option<String>,

    /// Watch-spec field printed as the object label.
    #[arg(long, value_enum, default_value_t = ObjectLabel::Path)]
    object_label: ObjectLabel,

    /// Validate input and print resolved settings, don't take a snapshot.
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only log errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber on stderr; stdout carries only metrics.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(LevelFilter::from_level(level).into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn build_source(args: &Args) -> Box<dyn SnapshotSource> {
    match &args.snapshot_file {
        Some(path) => Box::new(SnapshotFile::new(path)),
        None => Box::new(args.ps_command.clone()),
    }
}

fn print_dry_run(args: &Args, config: &MonitorConfig, self_name: &str) {
    println!("procwatch {} dry run", env!("CARGO_PKG_VERSION"));
    let mask: Vec<String> = config
        .metrics
        .iter()
        .map(|d| format!("{}={}", d.kind, if d.enabled { "on" } else { "off" }))
        .collect();
    println!("metrics: {}", mask.join(" "));
    for spec in &config.watches {
        println!(
            "watch: {} -> '{}' x{}",
            spec.label, spec.path, spec.expected_count
        );
    }
    match &args.snapshot_file {
        Some(path) => println!("listing: file {}", path.display()),
        None => println!("listing: {}", args.ps_command),
    }
    if self_name.is_empty() {
        println!("self exclusion: disabled");
    } else {
        println!("self exclusion: {}", self_name);
    }
}

/// Validates input, takes the snapshot and evaluates it.
///
/// Returns `None` on a dry run.
fn run(args: &Args) -> Result<Option<(MetricTable, Vec<MetricRecord>)>, MonitorError> {
    let config = MonitorConfig::from_args(&args.metric_state, &args.processes)?;
    info!(
        watches = config.watches.len(),
        enabled = config.metrics.iter().filter(|d| d.enabled).count(),
        "configuration loaded"
    );

    let self_name = args
        .self_name
        .clone()
        .or_else(program_name)
        .unwrap_or_default();

    if args.dry_run {
        print_dry_run(args, &config, &self_name);
        return Ok(None);
    }

    let monitor = Monitor::new(build_source(args))
        .with_self_name(self_name)
        .with_object_label(args.object_label);
    let records = monitor.collect(&config.watches)?;

    Ok(Some((config.metrics, records)))
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version print to stdout and succeed
            let code = if e.use_stderr() { EXIT_CONFIGURATION } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_logging(args.verbose, args.quiet);

    let (metrics, records) = match run(&args) {
        Ok(Some(result)) => result,
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    let mut reporter = Reporter::new(io::stdout().lock());
    match reporter.write_records(&records, &metrics) {
        Ok(written) => {
            info!(lines = written, "metrics written");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("failed to write metrics: {}", e);
            ExitCode::from(EXIT_CONFIGURATION)
        }
    }
}
