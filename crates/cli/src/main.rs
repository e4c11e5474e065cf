// ossror CLI - reconcile software-to-ROR links from multiple sources

mod exit_codes;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{
    recon_exit_code, source_exit_code, EXIT_ERROR, EXIT_OUTPUT_WRITE, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "ossror")]
#[command(about = "Reconcile software-to-organization (ROR) links from multiple sources")]
#[command(version)]
struct Cli {
    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every source, reconcile, and write the CSV and JSON projections
    #[command(after_help = "\
Examples:
  ossror run pipeline.toml
  ossror run pipeline.toml --json
  ossror run pipeline.toml --csv out/links.csv --json-out out/links.json
  RUST_LOG=ossror_io=debug ossror run pipeline.toml

Relative source and output paths resolve against the config file's directory.
--csv and --json-out are taken as given.")]
    Run {
        /// Path to the pipeline TOML file
        config: PathBuf,

        /// Print the run report (summary + slug conflicts) as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the CSV projection here instead of [output].csv
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Write the JSON projection here instead of [output].json
        #[arg(long, value_name = "PATH")]
        json_out: Option<PathBuf>,
    },

    /// Validate a pipeline config without reading any source
    #[command(after_help = "\
Examples:
  ossror validate pipeline.toml")]
    Validate {
        /// Path to the pipeline TOML file
        config: PathBuf,
    },

    /// List supported source kinds and their default evidence tags
    Sources,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run { config, json, csv, json_out } => run::cmd_run(config, json, csv, json_out),
        Commands::Validate { config } => run::cmd_validate(config),
        Commands::Sources => run::cmd_sources(),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Diagnostics go to stderr; stdout is reserved for `--json`.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn recon(err: ossror_recon::ReconError) -> Self {
        Self { code: recon_exit_code(&err), message: err.to_string(), hint: None }
    }

    pub fn source(err: ossror_io::SourceError) -> Self {
        let hint = match &err {
            ossror_io::SourceError::Record { .. } => {
                Some("set on_malformed = \"skip\" to drop malformed rows and continue".to_string())
            }
            ossror_io::SourceError::MissingColumn { .. } => {
                Some("check the source kind matches the file; `ossror sources` lists the kinds".to_string())
            }
            _ => None,
        };
        Self { code: source_exit_code(&err), message: err.to_string(), hint }
    }

    pub fn write(err: ossror_io::WriteError) -> Self {
        Self { code: EXIT_OUTPUT_WRITE, message: err.to_string(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
