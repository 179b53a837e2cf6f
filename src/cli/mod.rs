//! Command-line interface for pkgalter

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crate::alter::Context;
use crate::args::CmdArgs;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::database::Database;
use crate::engine::LocalEngine;
use crate::error::AlterError;
use crate::layout;
use crate::prompt::StdinPrompt;

mod install;
mod remove;
mod upgrade;

pub use install::{install_command, reinstall_command};
pub use remove::{auto_erase_command, erase_command};
pub use upgrade::{distro_sync_command, downgrade_command, upgrade_command};

#[derive(Subcommand)]
pub enum Commands {
    /// Install packages
    Install {
        /// Package name(s) to install
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Remove packages
    #[command(alias = "remove")]
    Erase {
        /// Package name(s) to remove
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Upgrade packages (all installed packages if none are named)
    #[command(alias = "update")]
    Upgrade {
        packages: Vec<String>,
    },

    /// Downgrade packages (all installed packages if none are named)
    Downgrade {
        packages: Vec<String>,
    },

    /// Synchronize installed packages with the catalog versions
    #[command(name = "distro-sync")]
    DistroSync {
        packages: Vec<String>,
    },

    /// Remove packages that are no longer needed
    #[command(name = "autoremove", alias = "autoerase")]
    AutoRemove {
        packages: Vec<String>,
    },

    /// Reinstall packages at their installed version
    Reinstall {
        /// Package name(s) to reinstall
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Import a TOML package catalog into the available set
    Import {
        /// Path to the catalog file
        catalog: PathBuf,
    },
}

impl Commands {
    fn verb(&self) -> &'static str {
        match self {
            Commands::Install { .. } => "install",
            Commands::Erase { .. } => "erase",
            Commands::Upgrade { .. } => "upgrade",
            Commands::Downgrade { .. } => "downgrade",
            Commands::DistroSync { .. } => "distro-sync",
            Commands::AutoRemove { .. } => "autoremove",
            Commands::Reinstall { .. } => "reinstall",
            Commands::Import { .. } => "import",
        }
    }
}

/// Signature shared by the alteration entry points
type EntryPoint = fn(&mut Context<'_>, &CmdArgs) -> crate::error::Result<()>;

/// Flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub assume_yes: bool,
    pub assume_no: bool,
    pub download_only: bool,
    pub download_dir: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
}

/// Build the argument record an alteration command runs with
pub fn command_args(
    verb: &str,
    packages: Vec<String>,
    options: &GlobalOptions,
    config: &Config,
) -> Result<CmdArgs, AlterError> {
    let args = CmdArgs {
        command: verb.to_string(),
        packages,
        no_output: options.quiet,
        assume_yes: options.assume_yes || config.main.assume_yes,
        assume_no: options.assume_no,
        download_only: options.download_only,
        download_dir: options
            .download_dir
            .clone()
            .or_else(|| config.main.download_dir.clone()),
    };

    // Quiet runs never show the prompt, so the answer must come from a flag
    if args.no_output && !args.assume_yes && !args.assume_no {
        return Err(AlterError::InvalidParameter(
            "--quiet needs --assumeyes or --assumeno".to_string(),
        ));
    }

    Ok(args)
}

/// Execute a CLI command
pub fn execute(command: Commands, options: &GlobalOptions, config: &Config) -> Result<()> {
    let db_path = options
        .db_path
        .clone()
        .unwrap_or_else(|| config.database.path.clone());
    tracing::debug!("Using state database {}", db_path.display());

    let verb = command.verb();

    let (packages, run) = match command {
        Commands::Install { packages } => (packages, install_command as EntryPoint),
        Commands::Erase { packages } => (packages, erase_command as EntryPoint),
        Commands::Upgrade { packages } => (packages, upgrade_command as EntryPoint),
        Commands::Downgrade { packages } => (packages, downgrade_command as EntryPoint),
        Commands::DistroSync { packages } => (packages, distro_sync_command as EntryPoint),
        Commands::AutoRemove { packages } => (packages, auto_erase_command as EntryPoint),
        Commands::Reinstall { packages } => (packages, reinstall_command as EntryPoint),
        Commands::Import { catalog } => {
            return import(&catalog, &db_path, options.quiet);
        }
    };

    let args = command_args(verb, packages, options, config)?;

    let db = Database::open(&db_path)?;
    let mut engine = LocalEngine::new(db, args.download_only);
    let mut prompt = StdinPrompt::stdio();
    let mut stdout = io::stdout();

    let mut ctx = Context {
        engine: &mut engine,
        prompt: &mut prompt,
        out: &mut stdout,
        width: layout::terminal_width(config.main.terminal_width),
    };

    run(&mut ctx, &args)?;
    Ok(())
}

fn import(catalog: &std::path::Path, db_path: &std::path::Path, quiet: bool) -> Result<()> {
    let db = Database::open(db_path)?;
    let count = Catalog::from_file(catalog)?.import(&db)?;

    if !quiet {
        println!(
            "{} Imported {} package(s) from {}",
            "✓".green(),
            count,
            catalog.display()
        );
    }

    Ok(())
}
