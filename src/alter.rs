//! The alteration command: resolve, report, confirm, apply
//!
//! Every verb (install, erase, upgrade, ...) funnels into [`alter`]. It asks
//! the engine for a plan, shows the plan, asks for confirmation and hands the
//! plan back to the engine to apply. The request's tokens and plan are owned
//! by the call and released on every exit path.

use std::io::Write;

use crate::args::{parse_package_args, CmdArgs};
use crate::engine::Engine;
use crate::error::{AlterError, Result};
use crate::package::{AlterType, ResolvedPlan};
use crate::prompt::Prompt;
use crate::report::PlanReporter;

/// Confirmation question shown before applying a plan
pub const CONFIRM_PROMPT: &str = "Is this ok [y/N]: ";

/// Collaborators an alteration runs against
pub struct Context<'a> {
    pub engine: &'a mut dyn Engine,
    pub prompt: &'a mut dyn Prompt,
    pub out: &'a mut dyn Write,
    /// Line width for plan tables
    pub width: usize,
}

/// Where an alteration currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlterState {
    ArgsParsed,
    Resolved,
    Reported,
    AwaitingConfirmation,
    Applying,
    Complete,
}

fn enter(alter_type: AlterType, state: AlterState) {
    tracing::debug!("{}: {:?}", alter_type, state);
}

/// Owns the per-call request data until the call ends
struct Invocation {
    alter_type: AlterType,
    packages: Vec<String>,
    plan: Option<ResolvedPlan>,
}

impl Drop for Invocation {
    fn drop(&mut self) {
        tracing::trace!(
            "{}: releasing {} token(s) and {}",
            self.alter_type,
            self.packages.len(),
            if self.plan.is_some() { "plan" } else { "no plan" }
        );
    }
}

/// Run one alteration end to end.
///
/// Returns `NothingToDo` when the plan has no action, `NoMatch` when it has
/// no action and some names were not found, and `OperationAborted` when the
/// user declines. An `AlreadyInstalled` error is reported as `NothingToDo`.
pub fn alter(ctx: &mut Context<'_>, args: &CmdArgs, alter_type: AlterType) -> Result<()> {
    run(ctx, args, alter_type).map_err(|e| match e {
        AlterError::AlreadyInstalled(name) => {
            tracing::debug!("{} is already installed, nothing to do", name);
            AlterError::NothingToDo
        }
        other => other,
    })
}

fn run(ctx: &mut Context<'_>, args: &CmdArgs, alter_type: AlterType) -> Result<()> {
    let silent = args.no_output;

    let mut invocation = Invocation {
        alter_type,
        packages: parse_package_args(args)?,
        plan: None,
    };
    enter(alter_type, AlterState::ArgsParsed);

    let plan = ctx.engine.resolve(alter_type, &invocation.packages)?;
    let plan = invocation.plan.insert(plan);
    enter(alter_type, AlterState::Resolved);

    let mut reporter = PlanReporter::new(&mut *ctx.out, ctx.width);

    if !silent && !plan.not_resolved.is_empty() {
        reporter.render_not_resolved(&plan.not_resolved)?;
    }

    if !plan.need_action {
        // Unmatched names are the more useful diagnostic
        return Err(if plan.not_resolved.is_empty() {
            AlterError::NothingToDo
        } else {
            AlterError::NoMatch
        });
    }

    if !silent {
        reporter.render(plan)?;
        if args.download_only {
            writeln!(
                ctx.out,
                "pkgalter will only download packages needed for the transaction"
            )?;
        }
    }
    enter(alter_type, AlterState::Reported);

    enter(alter_type, AlterState::AwaitingConfirmation);
    if !ctx.prompt.ask_yes_no(args, CONFIRM_PROMPT)? {
        tracing::debug!("{}: declined", alter_type);
        return Err(AlterError::OperationAborted);
    }

    if !silent && plan.need_download {
        writeln!(ctx.out, "\nDownloading:")?;
    }

    enter(alter_type, AlterState::Applying);
    ctx.engine.apply(alter_type, plan)?;

    if !silent {
        writeln!(ctx.out, "\nComplete!")?;
        if args.download_only {
            match &args.download_dir {
                Some(dir) => writeln!(ctx.out, "Packages have been downloaded to {}.", dir.display())?,
                None => writeln!(ctx.out, "Packages have been downloaded to cache.")?,
            }
        }
    }
    enter(alter_type, AlterState::Complete);

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::package::PackageInfo;
    use crate::size::format_size;

    const USER_TYPES: [AlterType; 9] = [
        AlterType::Install,
        AlterType::Erase,
        AlterType::Upgrade,
        AlterType::UpgradeAll,
        AlterType::DistroSync,
        AlterType::Downgrade,
        AlterType::DowngradeAll,
        AlterType::AutoErase,
        AlterType::Reinstall,
    ];

    enum Resolution {
        Plan(ResolvedPlan),
        AlreadyInstalled,
        Fail,
    }

    struct MockEngine {
        resolution: Resolution,
        fail_apply: bool,
        resolved: usize,
        applied: usize,
    }

    impl MockEngine {
        fn with_plan(plan: ResolvedPlan) -> Self {
            Self {
                resolution: Resolution::Plan(plan),
                fail_apply: false,
                resolved: 0,
                applied: 0,
            }
        }

        fn failing(resolution: Resolution) -> Self {
            Self {
                resolution,
                fail_apply: false,
                resolved: 0,
                applied: 0,
            }
        }
    }

    impl Engine for MockEngine {
        fn resolve(&mut self, alter_type: AlterType, _packages: &[String]) -> Result<ResolvedPlan> {
            self.resolved += 1;
            match &self.resolution {
                Resolution::Plan(plan) => Ok(ResolvedPlan {
                    alter_type,
                    ..plan.clone()
                }),
                Resolution::AlreadyInstalled => Err(AlterError::AlreadyInstalled("foo".to_string())),
                Resolution::Fail => Err(AlterError::Engine("metadata unavailable".to_string())),
            }
        }

        fn apply(&mut self, _alter_type: AlterType, _plan: &ResolvedPlan) -> Result<()> {
            self.applied += 1;
            if self.fail_apply {
                return Err(AlterError::Engine("disk full".to_string()));
            }
            Ok(())
        }
    }

    struct MockPrompt {
        answer: bool,
        asked: Vec<String>,
    }

    impl MockPrompt {
        fn answering(answer: bool) -> Self {
            Self {
                answer,
                asked: Vec::new(),
            }
        }
    }

    impl Prompt for MockPrompt {
        fn ask_yes_no(&mut self, _args: &CmdArgs, text: &str) -> Result<bool> {
            self.asked.push(text.to_string());
            Ok(self.answer)
        }
    }

    fn run_alter(
        engine: &mut MockEngine,
        prompt: &mut MockPrompt,
        args: &CmdArgs,
        alter_type: AlterType,
    ) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = {
            let mut ctx = Context {
                engine,
                prompt,
                out: &mut out,
                width: 80,
            };
            alter(&mut ctx, args, alter_type)
        };
        (result, String::from_utf8(out).unwrap())
    }

    fn foo() -> PackageInfo {
        PackageInfo {
            repo: Some("base".to_string()),
            install_size: 2048,
            formatted_size: Some(format_size(2048)),
            ..PackageInfo::new("foo", "1.0", "1", "x86_64")
        }
    }

    fn install_plan() -> ResolvedPlan {
        let mut plan = ResolvedPlan::new(AlterType::Install);
        plan.to_install.push(foo());
        plan.update_flags();
        plan
    }

    fn empty_plan(unresolved: &[&str]) -> ResolvedPlan {
        let mut plan = ResolvedPlan::new(AlterType::Install);
        plan.not_resolved = unresolved.iter().map(|s| s.to_string()).collect();
        plan
    }

    #[test]
    fn test_no_action_is_nothing_to_do() {
        for alter_type in USER_TYPES {
            let mut engine = MockEngine::with_plan(empty_plan(&[]));
            let mut prompt = MockPrompt::answering(true);
            let args = CmdArgs::new("x", &["foo"]);

            let (result, _) = run_alter(&mut engine, &mut prompt, &args, alter_type);
            assert!(matches!(result, Err(AlterError::NothingToDo)), "{}", alter_type);
            assert!(prompt.asked.is_empty());
            assert_eq!(engine.applied, 0);
        }
    }

    #[test]
    fn test_no_action_with_unresolved_is_no_match() {
        for alter_type in USER_TYPES {
            let mut engine = MockEngine::with_plan(empty_plan(&["ghost"]));
            let mut prompt = MockPrompt::answering(true);
            let args = CmdArgs::new("x", &["ghost"]);

            let (result, output) = run_alter(&mut engine, &mut prompt, &args, alter_type);
            assert!(matches!(result, Err(AlterError::NoMatch)), "{}", alter_type);
            assert!(output.contains("No package"));
            assert!(output.contains("ghost"));
        }
    }

    #[test]
    fn test_already_installed_is_nothing_to_do() {
        for alter_type in USER_TYPES {
            let mut engine = MockEngine::failing(Resolution::AlreadyInstalled);
            let mut prompt = MockPrompt::answering(true);
            let args = CmdArgs::new("x", &["foo"]);

            let (result, _) = run_alter(&mut engine, &mut prompt, &args, alter_type);
            assert!(matches!(result, Err(AlterError::NothingToDo)), "{}", alter_type);
        }
    }

    #[test]
    fn test_other_resolver_errors_pass_through() {
        let mut engine = MockEngine::failing(Resolution::Fail);
        let mut prompt = MockPrompt::answering(true);
        let args = CmdArgs::new("install", &["foo"]);

        let (result, output) = run_alter(&mut engine, &mut prompt, &args, AlterType::Install);
        assert!(matches!(result, Err(AlterError::Engine(_))));
        assert!(output.is_empty());
    }

    #[test]
    fn test_declined_never_applies() {
        let mut engine = MockEngine::with_plan(install_plan());
        let mut prompt = MockPrompt::answering(false);
        let args = CmdArgs::new("install", &["foo"]);

        let (result, output) = run_alter(&mut engine, &mut prompt, &args, AlterType::Install);
        assert!(matches!(result, Err(AlterError::OperationAborted)));
        assert_eq!(engine.applied, 0);
        assert_eq!(prompt.asked, vec![CONFIRM_PROMPT]);
        assert!(output.contains("Installing:"));
        assert!(!output.contains("Complete!"));
    }

    #[test]
    fn test_install_end_to_end() {
        let mut engine = MockEngine::with_plan(install_plan());
        let mut prompt = MockPrompt::answering(true);
        let args = CmdArgs::new("install", &["foo"]);

        let (result, output) = run_alter(&mut engine, &mut prompt, &args, AlterType::Install);
        assert!(result.is_ok());
        assert_eq!(engine.resolved, 1);
        assert_eq!(engine.applied, 1);

        let header = output.find("Installing:").unwrap();
        let row = output
            .lines()
            .find(|l| l.starts_with("foo") && l.contains("x86_64") && l.contains("1.0-1"))
            .unwrap();
        assert!(row.ends_with("2.0 k"));
        assert!(output.contains("Total installed size: 2.0 k"));
        assert!(output.contains("\nDownloading:\n"));
        let complete = output.find("Complete!").unwrap();
        assert!(header < complete);
        assert!(output.ends_with("\nComplete!\n"));
    }

    #[test]
    fn test_silent_mode_prints_nothing() {
        let mut plan = install_plan();
        plan.not_resolved.push("ghost".to_string());
        let mut engine = MockEngine::with_plan(plan);
        let mut prompt = MockPrompt::answering(true);
        let mut args = CmdArgs::new("install", &["foo", "ghost"]);
        args.no_output = true;
        args.download_only = true;

        let (result, output) = run_alter(&mut engine, &mut prompt, &args, AlterType::Install);
        assert!(result.is_ok());
        assert!(output.is_empty());
        assert_eq!(engine.applied, 1);
    }

    #[test]
    fn test_download_only_notices() {
        let mut engine = MockEngine::with_plan(install_plan());
        let mut prompt = MockPrompt::answering(true);
        let mut args = CmdArgs::new("install", &["foo"]);
        args.download_only = true;

        let (result, output) = run_alter(&mut engine, &mut prompt, &args, AlterType::Install);
        assert!(result.is_ok());
        assert!(output.contains("will only download packages needed for the transaction"));
        assert!(output.ends_with("Packages have been downloaded to cache.\n"));

        let mut engine = MockEngine::with_plan(install_plan());
        args.download_dir = Some(PathBuf::from("/tmp/pkgs"));
        let (_, output) = run_alter(&mut engine, &mut prompt, &args, AlterType::Install);
        assert!(output.ends_with("Packages have been downloaded to /tmp/pkgs.\n"));
    }

    #[test]
    fn test_apply_failure_passes_through() {
        let mut engine = MockEngine::with_plan(install_plan());
        engine.fail_apply = true;
        let mut prompt = MockPrompt::answering(true);
        let args = CmdArgs::new("install", &["foo"]);

        let (result, output) = run_alter(&mut engine, &mut prompt, &args, AlterType::Install);
        assert!(matches!(result, Err(AlterError::Engine(_))));
        assert!(!output.contains("Complete!"));
    }

    #[test]
    fn test_unresolved_reported_alongside_plan() {
        let mut plan = install_plan();
        plan.not_resolved.push("ghost".to_string());
        let mut engine = MockEngine::with_plan(plan);
        let mut prompt = MockPrompt::answering(true);
        let args = CmdArgs::new("install", &["foo", "ghost"]);

        let (result, output) = run_alter(&mut engine, &mut prompt, &args, AlterType::Install);
        assert!(result.is_ok());
        let missing = output.find("ghost").unwrap();
        let header = output.find("Installing:").unwrap();
        assert!(missing < header);
    }

    #[test]
    fn test_render_fault_stops_before_prompt() {
        let mut plan = ResolvedPlan::new(AlterType::Install);
        plan.to_install.push(PackageInfo::new("foo", &"1".repeat(300), "1", "x86_64"));
        plan.update_flags();
        let mut engine = MockEngine::with_plan(plan);
        let mut prompt = MockPrompt::answering(true);
        let args = CmdArgs::new("install", &["foo"]);

        let (result, _) = run_alter(&mut engine, &mut prompt, &args, AlterType::Install);
        assert!(matches!(result, Err(AlterError::Format(_))));
        assert!(prompt.asked.is_empty());
        assert_eq!(engine.applied, 0);
    }

    #[test]
    fn test_invalid_tokens_skip_resolution() {
        let mut engine = MockEngine::with_plan(install_plan());
        let mut prompt = MockPrompt::answering(true);
        let args = CmdArgs::new("install", &[""]);

        let (result, _) = run_alter(&mut engine, &mut prompt, &args, AlterType::Install);
        assert!(matches!(result, Err(AlterError::InvalidParameter(_))));
        assert_eq!(engine.resolved, 0);
    }
}
