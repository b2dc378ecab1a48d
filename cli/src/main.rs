use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use qa_report_core::{
    collect_report, read_json_report, render_terminal, report_qa_result, write_json_report,
    DiagnosticEmitter, FnEmitter, NodeDiagnostics, ReportMetadata, ReportOptions, StderrEmitter,
    TracingEmitter, REPORT_VERSION,
};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "qa-report")]
#[command(about = "Emit QA check results and collect them into asset reports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a check result and emit its serialized record
    Emit {
        /// Check status (pass, warn or fail; anything else is reported as error)
        status: String,

        /// Human-readable explanation of the result
        message: String,

        /// Where the record is emitted
        #[arg(long, value_enum, default_value_t = SinkArg::Stdout)]
        sink: SinkArg,
    },

    /// Collect node diagnostics into an asset report
    Collect {
        /// JSON file holding an array of node diagnostics
        input: PathBuf,

        /// Path of the checked asset
        #[arg(long)]
        asset_path: String,

        /// Output report file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Record that the host failed to cook the node chain
        #[arg(long)]
        cook_failed: bool,

        /// User name (defaults to $USERNAME)
        #[arg(long)]
        user: Option<String>,

        /// Machine name (defaults to $COMPUTERNAME)
        #[arg(long)]
        machine: Option<String>,

        /// Node types to leave out of the report
        #[arg(long = "skip-node-type", default_values_t = ReportOptions::default().skip_node_types)]
        skip_node_types: Vec<String>,

        /// Spaces per indentation level in the written report
        #[arg(long, default_value_t = 4)]
        indent: usize,

        /// Do not print the terminal summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the terminal summary of a saved report
    Show {
        /// Report JSON file
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum SinkArg {
    Stdout,
    Stderr,
    /// Emit as a warning-level log event
    Log,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing — logs go to stderr so stdout stays clean for JSON
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Emit {
            status,
            message,
            sink,
        } => {
            let mut stdout_sink = FnEmitter(|text: &str| println!("{text}"));
            let mut stderr_sink = StderrEmitter;
            let mut log_sink = TracingEmitter;
            let emitter: &mut dyn DiagnosticEmitter = match sink {
                SinkArg::Stdout => &mut stdout_sink,
                SinkArg::Stderr => &mut stderr_sink,
                SinkArg::Log => &mut log_sink,
            };

            report_qa_result(emitter, &status, &message)
                .map_err(|e| anyhow::Error::from(e).context("Failed to report result"))?;
        }
        Commands::Collect {
            input,
            asset_path,
            output,
            cook_failed,
            user,
            machine,
            skip_node_types,
            indent,
            quiet,
        } => {
            let nodes: Vec<NodeDiagnostics> = {
                let file = File::open(&input)
                    .with_context(|| format!("Failed to open input file: {}", input.display()))?;
                let reader = BufReader::new(file);
                serde_json::from_reader(reader).with_context(|| {
                    format!("Failed to parse node diagnostics from: {}", input.display())
                })?
            };

            let options = ReportOptions {
                skip_node_types,
                indent,
                ..ReportOptions::default()
            };
            let meta = ReportMetadata {
                user: user.unwrap_or_else(|| env_or_empty(&["USERNAME", "USER"])),
                machine: machine.unwrap_or_else(|| env_or_empty(&["COMPUTERNAME", "HOSTNAME"])),
                time: chrono::Local::now()
                    .format("%Y-%m-%d %H:%M:%S%.6f")
                    .to_string(),
                asset_path,
                cook_success: !cook_failed,
            };

            let report = collect_report(meta, &nodes, &options)
                .map_err(|e| anyhow::Error::from(e).context("Collecting report failed"))?;

            match output {
                Some(path) => write_json_report(&report, &path, options.indent)
                    .with_context(|| format!("Failed to write report: {}", path.display()))?,
                None => print!(
                    "{}",
                    report
                        .to_json_string(options.indent)
                        .context("Failed to serialize report")?
                ),
            }

            if !quiet {
                eprint!("{}", render_terminal(&report, &options.report_version)?);
            }
        }
        Commands::Show { input } => {
            let report = read_json_report(&input)
                .with_context(|| format!("Failed to read report: {}", input.display()))?;
            let rendered = render_terminal(&report, REPORT_VERSION)
                .with_context(|| format!("Cannot display report: {}", input.display()))?;
            print!("{rendered}");
        }
    }

    Ok(())
}

/// First set environment variable among `keys`, or an empty string.
fn env_or_empty(keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| std::env::var(key).ok())
        .unwrap_or_default()
}
