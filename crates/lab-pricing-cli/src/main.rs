mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analyze::AnalyzeArgs;
use commands::catalog::{PanelsArgs, TestsArgs, UsersArgs};
use commands::logs::LogsArgs;
use commands::price::PriceArgs;

/// Lab panel pricing and profitability analytics
#[derive(Parser)]
#[command(
    name = "labprice",
    version,
    about = "Lab panel pricing and profitability analytics",
    long_about = "Prices custom lab test panels (one anchor test at list price, add-ons \
                  discounted but floored above cost) and projects per-panel profitability \
                  against daily overhead and volume. Reads tests from JSON input or a \
                  YAML/JSON catalog."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Catalog file (YAML or JSON) with organizations, tests, panels and logs
    #[arg(long, global = true, env = "LABPRICE_CATALOG")]
    catalog: Option<String>,

    /// Organization whose tests, panels and logs are used
    #[arg(long, default_value = "org-1", global = true)]
    org: String,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a panel of tests (anchor at list, add-ons discounted with cost floor)
    Price(PriceArgs),
    /// Price a panel and project current vs future profitability
    Analyze(AnalyzeArgs),
    /// List or search the organization's tests
    Tests(TestsArgs),
    /// List or search the organization's saved panels
    Panels(PanelsArgs),
    /// Search the pricing audit log
    Logs(LogsArgs),
    /// List organizations with user counts and directory totals
    Orgs,
    /// List the organization's users and their roles
    Users(UsersArgs),
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

/// Options shared by every subcommand.
pub struct GlobalOpts {
    pub catalog: Option<String>,
    pub org: String,
}

fn main() {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    let opts = GlobalOpts {
        catalog: cli.catalog,
        org: cli.org,
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Price(args) => commands::price::run_price(args, &opts),
        Commands::Analyze(args) => commands::analyze::run_analyze(args, &opts),
        Commands::Tests(args) => commands::catalog::run_tests(args, &opts),
        Commands::Panels(args) => commands::catalog::run_panels(args, &opts),
        Commands::Logs(args) => commands::logs::run_logs(args, &opts),
        Commands::Orgs => commands::catalog::run_orgs(&opts),
        Commands::Users(args) => commands::catalog::run_users(args, &opts),
        Commands::Version => {
            println!("labprice {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
