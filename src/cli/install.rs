//! Install and reinstall commands

use crate::alter::{alter, Context};
use crate::args::CmdArgs;
use crate::error::Result;
use crate::package::AlterType;

/// Install the named packages
pub fn install_command(ctx: &mut Context<'_>, args: &CmdArgs) -> Result<()> {
    alter(ctx, args, AlterType::Install)
}

/// Reinstall the named packages at their installed version
pub fn reinstall_command(ctx: &mut Context<'_>, args: &CmdArgs) -> Result<()> {
    alter(ctx, args, AlterType::Reinstall)
}
