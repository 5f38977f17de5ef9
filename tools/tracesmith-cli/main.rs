use anyhow::{Context, bail};
use clap::Parser;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracesmith::codegen::{render, write_program};
use tracesmith::config::{CommandLine, Config, INPUT_PATHS_ENV};
use tracesmith::error::{ContractError, ConversionError};
use tracesmith::plugin::PluginRegistry;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Converts recorded browser sessions (HAR files) into a Locust load-test program
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// HAR files, or directories of HAR files, to convert
    input_paths: Vec<PathBuf>,

    /// Plugin to apply, by name. Repeat to apply several, in order
    #[arg(short, long = "plugin", value_name = "NAME")]
    plugins: Vec<String>,

    /// Do not apply the default plugins
    #[arg(long)]
    no_default_plugins: bool,

    /// File of URL patterns to leave out, one per line [default: .urlignore]
    #[arg(long, value_name = "FILE")]
    denylist: Option<PathBuf>,

    /// Write the program to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the names of the available plugins and exit
    #[arg(long)]
    list_plugins: bool,
}

#[derive(Debug)]
struct NoInputs;

impl std::fmt::Display for NoInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no input paths given; pass them as arguments or in {}",
            INPUT_PATHS_ENV
        )
    }
}

impl std::error::Error for NoInputs {}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nError: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.list_plugins {
        let registry = PluginRegistry::with_builtins()?;
        for name in registry.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = Config::from_command_line(CommandLine {
        input_paths: cli.input_paths,
        plugins: cli.plugins,
        no_default_plugins: cli.no_default_plugins,
        denylist: cli.denylist,
    });
    if config.input_paths.is_empty() {
        bail!(NoInputs);
    }

    let compilation = config.convert()?;
    if !compilation.skipped.is_empty() {
        warn!("{} scenario(s) were skipped or are empty", compilation.skipped.len());
    }

    match &cli.output {
        Some(path) => {
            let lines = render(compilation.program)?;
            fs::write(path, lines.join("\n"))
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            info!(path = %path.display(), lines = lines.len(), "Wrote locustfile");
        }
        None => write_program(&mut io::stdout().lock(), compilation.program)?,
    }
    Ok(())
}

/// 1: nothing to convert, 2: plugins could not be resolved, 3: anything else.
fn exit_code(error: &anyhow::Error) -> u8 {
    if error.is::<NoInputs>() {
        return 1;
    }
    let plugin_failure = error.is::<ContractError>()
        || matches!(
            error.downcast_ref::<ConversionError>(),
            Some(ConversionError::Contract(_))
        );
    if plugin_failure { 2 } else { 3 }
}
