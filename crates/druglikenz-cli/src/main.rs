mod commands;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use output::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "druglikenz",
    version,
    about = "Drug-likeness screening of compound libraries (Lipinski, RO3, Muegge, Veber)"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen a CSV, TSV or XLSX file of SMILES against one or more rule sets
    Screen {
        /// Path to the input file
        input_file: PathBuf,

        /// Column holding the SMILES strings
        #[arg(short, long, default_value = "SMILES")]
        column: String,

        /// Rule set(s) to evaluate: lipinski, ro3, muegge, veber
        #[arg(short, long = "rule", value_name = "NAME", default_value = "lipinski")]
        rules: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,

        /// Write accepted compounds to a CSV/TSV file
        #[arg(long, value_name = "FILE")]
        accepted_out: Option<PathBuf>,

        /// Write the paged pass/fail matrix to a JSON file
        #[arg(long, value_name = "FILE")]
        matrix_out: Option<PathBuf>,

        /// Write compounds that could not be evaluated to a CSV file
        #[arg(long, value_name = "FILE")]
        failures_out: Option<PathBuf>,

        #[command(flatten)]
        resolution: ResolutionArgs,
    },
    /// Compute descriptors for SMILES strings without evaluating any rule
    Describe {
        /// One or more SMILES strings
        #[arg(required = true)]
        smiles: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,

        #[command(flatten)]
        resolution: ResolutionArgs,
    },
    /// Inspect the built-in rule sets
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(clap::Args)]
struct ResolutionArgs {
    /// Never contact PubChem
    #[arg(long)]
    offline: bool,

    /// Look up a display name for each compound on PubChem
    #[arg(long)]
    names: bool,

    /// Resolution worker threads
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Config file (default: ./druglikenz.toml if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum RulesAction {
    /// List the built-in rule sets
    List,
    /// Explain a rule set's criteria and acceptance policy
    Explain {
        /// Rule key or display name (e.g., "lipinski")
        name: String,
    },
    /// Validate a custom rule file
    Validate {
        /// Path to JSON rule file
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Screen {
            input_file,
            column,
            rules,
            output,
            accepted_out,
            matrix_out,
            failures_out,
            resolution,
        } => commands::screen::run(commands::screen::ScreenArgs {
            input_file,
            column,
            rules,
            output,
            accepted_out,
            matrix_out,
            failures_out,
            overrides: resolution.overrides(),
            config: resolution.config,
        }),
        Commands::Describe {
            smiles,
            output,
            resolution,
        } => commands::describe::run(
            &smiles,
            output,
            resolution.config.as_deref(),
            &resolution.overrides(),
        ),
        Commands::Rules { action } => match action {
            RulesAction::List => commands::rules::list(),
            RulesAction::Explain { name } => commands::rules::explain(&name),
            RulesAction::Validate { file } => commands::rules::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

impl ResolutionArgs {
    fn overrides(&self) -> druglikenz_core::config::CliOverrides {
        druglikenz_core::config::CliOverrides {
            workers: self.workers,
            offline: self.offline,
            lookup_names: self.names,
        }
    }
}
