mod commands;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use recon_core::model::Provider;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use commands::process::ProcessOptions;

#[derive(Parser)]
#[command(
    name = "recon",
    version,
    about = "Rebuild bank statement PDFs into reconciled transaction ledgers"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the JSON account configuration
    #[arg(short, long, global = true, default_value = "recon.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile every new statement in each account's raw/ folder
    Process {
        /// Only process this account (default: all accounts)
        #[arg(short, long)]
        account: Option<String>,

        /// Reprocess statements that are already named by their month range
        #[arg(short, long)]
        force: bool,

        /// Read only the statement period and skip files it already names
        #[arg(long)]
        quick: bool,

        /// Print every transaction of each statement
        #[arg(short, long)]
        log: bool,
    },
    /// Reconcile a single statement PDF and print it
    Parse {
        /// Path to the statement PDF
        input_file: PathBuf,

        /// Statement provider: boq, coles, commbank, hsbc or ing
        #[arg(short, long)]
        provider: Provider,

        /// User password for an encrypted statement
        #[arg(long)]
        password: Option<String>,

        /// Output format: table (default), json or csv
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Merge every account's ledgers into one CSV per month
    Collate {
        /// First month, as YYYY-MM
        from: String,

        /// Last month, as YYYY-MM (default: same as first)
        to: Option<String>,
    },
    /// Summarise one or more ledger CSVs by type and category
    Summarise {
        /// Ledger CSV files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Process {
            account,
            force,
            quick,
            log,
        } => commands::process::run(
            &cli.config,
            account.as_deref(),
            ProcessOptions { force, quick, log },
        ),
        Commands::Parse {
            input_file,
            provider,
            password,
            output,
        } => commands::parse::run(&input_file, provider, password.as_deref(), &output),
        Commands::Collate { from, to } => commands::collate::run(&cli.config, &from, to.as_deref()),
        Commands::Summarise { files, output } => commands::summarise::run(&files, &output),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
