//! Resolver/applier engines
//!
//! The orchestrator only sees the [`Engine`] trait. [`LocalEngine`] is the
//! engine the binary uses: it matches requested names against a local state
//! database and records applied changes there. It does not follow
//! dependencies and never touches package files.

use std::cmp::Ordering;

use crate::database::Database;
use crate::error::{AlterError, Result};
use crate::package::{AlterType, PackageInfo, ResolvedPlan};
use crate::size::format_size;

/// Resolves alteration requests into plans and applies them
pub trait Engine {
    /// Work out what `alter_type` means for the named packages
    fn resolve(&mut self, alter_type: AlterType, packages: &[String]) -> Result<ResolvedPlan>;

    /// Carry out a plan previously returned by `resolve`
    fn apply(&mut self, alter_type: AlterType, plan: &ResolvedPlan) -> Result<()>;
}

/// Engine backed by the local state database
pub struct LocalEngine {
    db: Database,
    download_only: bool,
}

impl LocalEngine {
    pub fn new(db: Database, download_only: bool) -> Self {
        Self { db, download_only }
    }

    /// Access the underlying database
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Highest available version of a package
    fn best_available(&self, name: &str) -> Result<Option<PackageInfo>> {
        Ok(self
            .db
            .available_versions(name)?
            .into_iter()
            .max_by(|a, b| a.evr_cmp(b)))
    }

    /// Highest available version ordered `wanted` relative to `installed`
    fn best_relative(&self, installed: &PackageInfo, wanted: Ordering) -> Result<Option<PackageInfo>> {
        Ok(self
            .db
            .available_versions(installed.name())?
            .into_iter()
            .filter(|candidate| candidate.evr_cmp(installed) == wanted)
            .max_by(|a, b| a.evr_cmp(b)))
    }

    /// Installed packages the request applies to; all of them when no names are given
    fn targets(&self, packages: &[String], plan: &mut ResolvedPlan) -> Result<Vec<PackageInfo>> {
        if packages.is_empty() {
            return self.db.list_installed();
        }

        let mut targets = Vec::new();
        for name in packages {
            match self.db.get_installed(name)? {
                Some(pkg) => targets.push(pkg),
                None => plan.not_resolved.push(name.clone()),
            }
        }
        Ok(targets)
    }

    fn resolve_install(&self, packages: &[String], plan: &mut ResolvedPlan) -> Result<()> {
        for name in packages {
            if let Some(installed) = self.db.get_installed(name)? {
                plan.existing.push(installed);
            } else if let Some(candidate) = self.best_available(name)? {
                plan.to_install.push(candidate);
            } else {
                plan.not_resolved.push(name.clone());
            }
        }
        Ok(())
    }

    fn resolve_reinstall(&self, packages: &[String], plan: &mut ResolvedPlan) -> Result<()> {
        for installed in self.targets(packages, plan)? {
            match self.best_relative(&installed, Ordering::Equal)? {
                Some(candidate) => plan.to_reinstall.push(candidate),
                None => plan.not_available.push(installed),
            }
        }
        Ok(())
    }
}

impl Engine for LocalEngine {
    fn resolve(&mut self, alter_type: AlterType, packages: &[String]) -> Result<ResolvedPlan> {
        tracing::debug!("Resolving {} for {} package(s)", alter_type, packages.len());

        let mut plan = ResolvedPlan::new(alter_type);

        match alter_type {
            AlterType::Install => self.resolve_install(packages, &mut plan)?,
            AlterType::Reinstall => self.resolve_reinstall(packages, &mut plan)?,
            AlterType::Erase => {
                let targets = self.targets(packages, &mut plan)?;
                plan.to_remove = targets;
            }
            AlterType::AutoErase => {
                // Nothing is recorded as a dependency, so only named packages qualify
                if !packages.is_empty() {
                    let targets = self.targets(packages, &mut plan)?;
                    plan.unneeded = targets;
                }
            }
            AlterType::Upgrade | AlterType::UpgradeAll => {
                for installed in self.targets(packages, &mut plan)? {
                    if let Some(candidate) = self.best_relative(&installed, Ordering::Greater)? {
                        plan.to_upgrade.push(candidate);
                    }
                }
            }
            AlterType::Downgrade | AlterType::DowngradeAll => {
                for installed in self.targets(packages, &mut plan)? {
                    if let Some(candidate) = self.best_relative(&installed, Ordering::Less)? {
                        plan.to_downgrade.push(candidate);
                    }
                }
            }
            AlterType::DistroSync => {
                for installed in self.targets(packages, &mut plan)? {
                    let Some(candidate) = self.best_available(installed.name())? else {
                        continue;
                    };
                    match candidate.evr_cmp(&installed) {
                        Ordering::Greater => plan.to_upgrade.push(candidate),
                        Ordering::Less => plan.to_downgrade.push(candidate),
                        Ordering::Equal => {}
                    }
                }
            }
            AlterType::Obsoleted => {
                return Err(AlterError::InvalidParameter(
                    "obsoleted is not a user alteration".to_string(),
                ));
            }
        }

        for list in [
            &mut plan.existing,
            &mut plan.not_available,
            &mut plan.to_install,
            &mut plan.to_upgrade,
            &mut plan.to_downgrade,
            &mut plan.to_remove,
            &mut plan.unneeded,
            &mut plan.to_reinstall,
        ] {
            for pkg in list.iter_mut() {
                pkg.formatted_size = Some(format_size(pkg.install_size));
            }
        }

        plan.update_flags();

        tracing::debug!(
            "Resolved {}: {} change(s), {} unresolved",
            alter_type,
            plan.change_count(),
            plan.not_resolved.len()
        );

        Ok(plan)
    }

    fn apply(&mut self, alter_type: AlterType, plan: &ResolvedPlan) -> Result<()> {
        if self.download_only {
            tracing::info!("Download only, leaving installed state unchanged");
            return Ok(());
        }

        let install: Vec<&PackageInfo> = plan
            .to_install
            .iter()
            .chain(&plan.to_upgrade)
            .chain(&plan.to_downgrade)
            .chain(&plan.to_reinstall)
            .collect();
        let remove: Vec<&PackageInfo> = plan
            .to_remove
            .iter()
            .chain(&plan.unneeded)
            .chain(&plan.obsoleted)
            .collect();

        for pkg in &install {
            tracing::info!("Installing {} {}", pkg.name(), pkg.full_version());
        }
        for pkg in &remove {
            tracing::info!("Removing {}", pkg.name());
        }

        self.db
            .commit_changes(&install, &remove)
            .map_err(|e| AlterError::Engine(format!("{} failed: {}", alter_type, e)))
    }
}
