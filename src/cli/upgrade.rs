//! Upgrade, downgrade and distro-sync commands

use crate::alter::{alter, Context};
use crate::args::CmdArgs;
use crate::error::Result;
use crate::package::AlterType;

/// Upgrade the named packages, or everything when none are named
pub fn upgrade_command(ctx: &mut Context<'_>, args: &CmdArgs) -> Result<()> {
    let alter_type = if args.has_packages() {
        AlterType::Upgrade
    } else {
        AlterType::UpgradeAll
    };
    alter(ctx, args, alter_type)
}

/// Downgrade the named packages, or everything when none are named
pub fn downgrade_command(ctx: &mut Context<'_>, args: &CmdArgs) -> Result<()> {
    let alter_type = if args.has_packages() {
        AlterType::Downgrade
    } else {
        AlterType::DowngradeAll
    };
    alter(ctx, args, alter_type)
}

/// Move installed packages to the versions the catalog offers
pub fn distro_sync_command(ctx: &mut Context<'_>, args: &CmdArgs) -> Result<()> {
    alter(ctx, args, AlterType::DistroSync)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::package::ResolvedPlan;
    use crate::prompt::Prompt;

    /// Records the alteration type it was asked to resolve
    struct RecordingEngine {
        seen: Vec<AlterType>,
    }

    impl Engine for RecordingEngine {
        fn resolve(&mut self, alter_type: AlterType, _packages: &[String]) -> Result<ResolvedPlan> {
            self.seen.push(alter_type);
            Ok(ResolvedPlan::new(alter_type))
        }

        fn apply(&mut self, _alter_type: AlterType, _plan: &ResolvedPlan) -> Result<()> {
            Ok(())
        }
    }

    struct Never;

    impl Prompt for Never {
        fn ask_yes_no(&mut self, _args: &CmdArgs, _text: &str) -> Result<bool> {
            Ok(false)
        }
    }

    fn seen(command: fn(&mut Context<'_>, &CmdArgs) -> Result<()>, packages: &[&str]) -> AlterType {
        let mut engine = RecordingEngine { seen: Vec::new() };
        let mut out = Vec::new();
        let mut ctx = Context {
            engine: &mut engine,
            prompt: &mut Never,
            out: &mut out,
            width: 80,
        };
        let _ = command(&mut ctx, &CmdArgs::new("x", packages));
        engine.seen[0]
    }

    #[test]
    fn test_all_variants_without_names() {
        assert_eq!(seen(upgrade_command, &[]), AlterType::UpgradeAll);
        assert_eq!(seen(upgrade_command, &["foo"]), AlterType::Upgrade);
        assert_eq!(seen(downgrade_command, &[]), AlterType::DowngradeAll);
        assert_eq!(seen(downgrade_command, &["foo"]), AlterType::Downgrade);
        assert_eq!(seen(distro_sync_command, &[]), AlterType::DistroSync);
    }
}
