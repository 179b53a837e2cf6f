//! pkgalter command-line entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use pkgalter::cli::{self, Commands, GlobalOptions};
use pkgalter::config::Config;
use pkgalter::AlterError;

#[derive(Parser)]
#[command(name = "pkgalter")]
#[command(about = "Resolve, review and apply package alterations", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, env = "PKGALTER_CONFIG")]
    config: Option<PathBuf>,

    /// State database (overrides the configuration)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print nothing but errors (needs --assumeyes or --assumeno)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Answer yes to the confirmation prompt
    #[arg(short = 'y', long = "assumeyes", global = true, conflicts_with = "assume_no")]
    assume_yes: bool,

    /// Answer no to the confirmation prompt
    #[arg(long = "assumeno", global = true)]
    assume_no: bool,

    /// Only download the packages of the transaction
    #[arg(long = "downloadonly", global = true)]
    download_only: bool,

    /// Where to put packages with --downloadonly
    #[arg(long = "downloaddir", global = true, requires = "download_only")]
    download_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let quiet = cli.quiet;
    let options = GlobalOptions {
        quiet: cli.quiet,
        assume_yes: cli.assume_yes,
        assume_no: cli.assume_no,
        download_only: cli.download_only,
        download_dir: cli.download_dir,
        db_path: cli.db,
    };

    let result = Config::load(cli.config.as_deref())
        .and_then(|config| cli::execute(cli.command, &options, &config));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<AlterError>() {
            Some(AlterError::NothingToDo) => {
                if !quiet {
                    println!("Nothing to do.");
                }
                ExitCode::SUCCESS
            }
            Some(alter_err) => {
                eprintln!("{} {}", "Error:".red().bold(), alter_err);
                ExitCode::from(alter_err.code() as u8)
            }
            None => {
                eprintln!("{} {:#}", "Error:".red().bold(), err);
                ExitCode::FAILURE
            }
        },
    }
}
