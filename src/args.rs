//! Parsed command arguments handed to the alteration commands

use std::path::PathBuf;

use crate::error::{AlterError, Result};

/// One parsed command line
#[derive(Debug, Clone, Default)]
pub struct CmdArgs {
    /// Command verb (install, erase, ...)
    pub command: String,

    /// Package name tokens following the verb
    pub packages: Vec<String>,

    /// Suppress all informational output
    pub no_output: bool,

    /// Answer yes to the confirmation prompt
    pub assume_yes: bool,

    /// Answer no to the confirmation prompt
    pub assume_no: bool,

    /// Fetch packages without applying them
    pub download_only: bool,

    /// Where download-only runs place packages (cache if unset)
    pub download_dir: Option<PathBuf>,
}

impl CmdArgs {
    pub fn new(command: &str, packages: &[&str]) -> Self {
        Self {
            command: command.to_string(),
            packages: packages.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    /// True when the command named no packages
    pub fn has_packages(&self) -> bool {
        !self.packages.is_empty()
    }
}

/// Extract the package name tokens from a command.
///
/// Blank or whitespace-bearing tokens are rejected.
pub fn parse_package_args(args: &CmdArgs) -> Result<Vec<String>> {
    if args.command.trim().is_empty() {
        return Err(AlterError::InvalidParameter("missing command".to_string()));
    }

    args.packages
        .iter()
        .map(|token| {
            let token = token.trim();
            if token.is_empty() || token.contains(char::is_whitespace) {
                Err(AlterError::InvalidParameter(format!(
                    "invalid package name '{}'",
                    token
                )))
            } else {
                Ok(token.to_string())
            }
        })
        .collect()
}
