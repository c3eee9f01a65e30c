//! BillingMonitor CLI
//!
//! Command-line interface for synthesizing the billing monitor stack.

use std::path::PathBuf;
use std::process::ExitCode;

use billing_monitor::config::load_dotenv;
use billing_monitor::logging;
use billing_monitor::prelude::*;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

/// BillingMonitor - AWS billing alarms relayed to Slack
#[derive(Parser)]
#[command(name = "billing-monitor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "BILLING_MONITOR_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (for commands that support it)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize the stack into a cloud assembly
    Synth {
        /// Output directory (overrides output.dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the template to stdout instead of writing files
        #[arg(long)]
        stdout: bool,
    },

    /// List the declared resources
    List,

    /// Show the watched services
    Services,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Serialize)]
struct ResourceRow<'a> {
    kind: ResourceKind,
    construct_id: &'a str,
    logical_id: &'a LogicalId,
}

fn main() -> ExitCode {
    // Before parsing, so `.env` can supply BILLING_MONITOR_CONFIG
    if let Err(e) = load_dotenv() {
        eprintln!("Error loading configuration: {e}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return ExitCode::SUCCESS;
    }

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&settings.logging, cli.verbose);

    let result = match cli.command {
        Commands::Synth { output, stdout } => run_synth(&settings, output, stdout),
        Commands::List => run_list(&settings, cli.format),
        Commands::Services => run_services(cli.format),
        Commands::Completions { .. } => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_synth(settings: &Settings, output: Option<PathBuf>, stdout: bool) -> anyhow::Result<()> {
    let stack = StackDefinition::new(settings).build()?;
    let template = CloudFormationSynthesizer.synthesize(&stack)?;

    if stdout {
        println!("{}", template.to_json_pretty()?);
        return Ok(());
    }

    let dir = output.unwrap_or_else(|| PathBuf::from(&settings.output.dir));
    let paths = CloudAssembly::new(dir).write(&stack, &template)?;
    info!(stack = %stack.name(), "synthesized");
    println!("{}", paths.template.display());
    Ok(())
}

fn run_list(settings: &Settings, format: OutputFormat) -> anyhow::Result<()> {
    let stack = StackDefinition::new(settings).build()?;
    let rows: Vec<ResourceRow<'_>> = stack
        .resources()
        .iter()
        .map(|resource| ResourceRow {
            kind: resource.kind(),
            construct_id: &resource.construct_id,
            logical_id: &resource.logical_id,
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => {
            for row in &rows {
                println!(
                    "{:<42} {:<20} {}",
                    row.kind.type_name(),
                    row.construct_id,
                    row.logical_id
                );
            }
        }
    }
    Ok(())
}

fn run_services(format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&BilledService::ALL)?);
        }
        OutputFormat::Text => {
            for service in BilledService::ALL {
                println!("{service}");
            }
        }
    }
    Ok(())
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "billing-monitor", &mut io::stdout());
}
