//! Erase and autoremove commands

use crate::alter::{alter, Context};
use crate::args::CmdArgs;
use crate::error::Result;
use crate::package::AlterType;

/// Remove the named packages
pub fn erase_command(ctx: &mut Context<'_>, args: &CmdArgs) -> Result<()> {
    alter(ctx, args, AlterType::Erase)
}

/// Remove packages nothing needs any more
pub fn auto_erase_command(ctx: &mut Context<'_>, args: &CmdArgs) -> Result<()> {
    alter(ctx, args, AlterType::AutoErase)
}
