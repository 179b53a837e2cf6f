//! Rendering of resolved plans
//!
//! Prints skipped and unavailable packages, then one table per alteration
//! category, each followed by the total installed size of its rows.

use std::io::Write;

use colored::Colorize;

use crate::error::{AlterError, Result};
use crate::layout::{self, PLAN_COLUMNS};
use crate::package::{AlterType, PackageInfo, ResolvedPlan};
use crate::size::format_size;

/// Longest `[epoch:]version-release` string a table row may hold
pub const MAX_COLUMN_LEN: usize = 256;

/// Writes plan listings to an output sink
pub struct PlanReporter<W: Write> {
    out: W,
    width: usize,
}

impl<W: Write> PlanReporter<W> {
    /// Create a reporter that lays tables out for a line of `width` characters
    pub fn new(out: W, width: usize) -> Self {
        Self { out, width }
    }

    /// Give back the output sink
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Render every non-empty section of the plan, in fixed order
    pub fn render(&mut self, plan: &ResolvedPlan) -> Result<()> {
        for pkg in &plan.existing {
            writeln!(
                self.out,
                "Package {}-{}-{}.{} is already installed, skipping.",
                pkg.name(),
                pkg.version,
                pkg.release,
                pkg.arch()
            )?;
        }

        for pkg in &plan.not_available {
            writeln!(self.out, "No package {} available.", pkg.name())?;
        }

        for (packages, alter_type) in plan.tables() {
            if !packages.is_empty() {
                self.print_action(packages, alter_type)?;
            }
        }

        Ok(())
    }

    /// Report requested names the resolver could not match
    pub fn render_not_resolved(&mut self, names: &[String]) -> Result<()> {
        for name in names {
            writeln!(self.out, "No package {} available", name.bold())?;
        }
        Ok(())
    }

    /// Print one alteration table and its size total
    pub fn print_action(&mut self, packages: &[PackageInfo], alter_type: AlterType) -> Result<()> {
        let header = alter_type.header().ok_or_else(|| {
            AlterError::InvalidParameter(format!("no table for alteration type {}", alter_type))
        })?;

        let widths = layout::compute(&PLAN_COLUMNS, self.width)?;

        writeln!(self.out)?;
        writeln!(self.out, "{}", header)?;
        writeln!(self.out)?;

        let mut total_size: u64 = 0;
        for pkg in packages {
            total_size = total_size.saturating_add(pkg.install_size);
            let evr = epoch_version_release(pkg)?;

            writeln!(
                self.out,
                "{:<w0$} {:<w1$} {:<w2$} {:<w3$} {:>w4$}",
                pkg.name(),
                pkg.arch(),
                evr,
                pkg.repo.as_deref().unwrap_or(""),
                pkg.formatted_size.as_deref().unwrap_or(""),
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
                w3 = widths[3],
                w4 = widths[4],
            )?;
        }

        writeln!(self.out)?;
        writeln!(self.out, "Total installed size: {}", format_size(total_size))?;

        Ok(())
    }
}

/// Compose `[epoch:]version-release`, refusing to exceed the column limit
pub fn epoch_version_release(pkg: &PackageInfo) -> Result<String> {
    let evr = pkg.full_version();
    if evr.chars().count() > MAX_COLUMN_LEN {
        return Err(AlterError::Format(format!(
            "version of {} is {} characters long (limit {})",
            pkg.name(),
            evr.chars().count(),
            MAX_COLUMN_LEN
        )));
    }
    Ok(evr)
}
