mod commands;
mod input;
mod output;
mod settings;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use mudda_core::MuddaError;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::bank::BankCommand;
use commands::calculate::CalculateArgs;
use commands::case::CaseCommand;
use commands::date::DateCommand;
use commands::digits::DigitsCommand;
use commands::report::ReportArgs;
use settings::AppConfig;

/// Interest, tax revenue and payable amounts for tribunal cases
#[derive(Parser)]
#[command(
    name = "mudda",
    version,
    about = "Interest, tax revenue and payable amounts for tribunal cases",
    long_about = "A CLI for debt-recovery tribunal case records. Dates are Bikram Sambat \
                  (YYYY-MM-DD) and amounts may be typed with Devanagari or ASCII digits. \
                  Supports stand-alone calculation, BS/AD conversion, a case and bank \
                  store, and report layout."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Case store file (overrides the configured path)
    #[arg(long, global = true)]
    store: Option<String>,

    /// Extra configuration file, layered over mudda.toml
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate interest, tax revenue and payable amount
    Calculate(CalculateArgs),
    /// Convert between BS and AD dates
    Date {
        #[command(subcommand)]
        command: DateCommand,
    },
    /// Transliterate digits between Devanagari and ASCII
    Digits {
        #[command(subcommand)]
        command: DigitsCommand,
    },
    /// Create, view, edit and remove case records
    Case {
        #[command(subcommand)]
        command: CaseCommand,
    },
    /// Manage the petitioner bank directory
    Bank {
        #[command(subcommand)]
        command: BankCommand,
    },
    /// Lay out the printable report for a case
    Report(ReportArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    if let Some(store) = cli.store {
        config.store.path = store.into();
    }

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("MUDDA_LOG")
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::calculate::run_calculate(args, &config),
        Commands::Date { command } => commands::date::run_date(command),
        Commands::Digits { command } => commands::digits::run_digits(command),
        Commands::Case { command } => commands::case::run_case(command, &config),
        Commands::Bank { command } => commands::bank::run_bank(command, &config),
        Commands::Report(args) => commands::report::run_report(args, &config),
        Commands::Version => {
            println!("mudda {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            if let Some(err) = e.downcast_ref::<MuddaError>() {
                match err.field() {
                    Some(field) => eprintln!("  {} ({})", err.localized(), field),
                    None => eprintln!("  {}", err.localized()),
                }
            }
            process::exit(1);
        }
    }
}
