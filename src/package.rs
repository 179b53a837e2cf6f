//! Package types and alteration plans

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Kind of change requested against installed package state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlterType {
    Install,
    Erase,
    Upgrade,
    UpgradeAll,
    DistroSync,
    Downgrade,
    DowngradeAll,
    AutoErase,
    Reinstall,
    /// Report-only; never issued by a user command
    Obsoleted,
}

impl AlterType {
    /// Table header used when listing packages of this kind.
    ///
    /// Only the types that have their own plan category carry a header.
    pub fn header(self) -> Option<&'static str> {
        match self {
            AlterType::Install => Some("Installing:"),
            AlterType::Upgrade => Some("Upgrading:"),
            AlterType::Erase => Some("Removing:"),
            AlterType::Downgrade => Some("Downgrading:"),
            AlterType::Reinstall => Some("Reinstalling:"),
            AlterType::Obsoleted => Some("Obsoleting:"),
            _ => None,
        }
    }
}

impl std::fmt::Display for AlterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlterType::Install => write!(f, "install"),
            AlterType::Erase => write!(f, "erase"),
            AlterType::Upgrade => write!(f, "upgrade"),
            AlterType::UpgradeAll => write!(f, "upgrade-all"),
            AlterType::DistroSync => write!(f, "distro-sync"),
            AlterType::Downgrade => write!(f, "downgrade"),
            AlterType::DowngradeAll => write!(f, "downgrade-all"),
            AlterType::AutoErase => write!(f, "autoerase"),
            AlterType::Reinstall => write!(f, "reinstall"),
            AlterType::Obsoleted => write!(f, "obsoleted"),
        }
    }
}

impl std::str::FromStr for AlterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "install" => Ok(AlterType::Install),
            "erase" | "remove" => Ok(AlterType::Erase),
            "upgrade" | "update" => Ok(AlterType::Upgrade),
            "upgrade-all" => Ok(AlterType::UpgradeAll),
            "distro-sync" => Ok(AlterType::DistroSync),
            "downgrade" => Ok(AlterType::Downgrade),
            "downgrade-all" => Ok(AlterType::DowngradeAll),
            "autoerase" | "autoremove" => Ok(AlterType::AutoErase),
            "reinstall" => Ok(AlterType::Reinstall),
            "obsoleted" => Ok(AlterType::Obsoleted),
            _ => Err(format!("Unknown alteration type: {}", s)),
        }
    }
}

/// A concrete package taking part in a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Package name
    #[serde(default)]
    pub name: Option<String>,

    /// Architecture (e.g. x86_64, noarch)
    #[serde(default)]
    pub arch: Option<String>,

    /// Version string
    pub version: String,

    /// Release string
    pub release: String,

    /// Epoch; 0 means unset and is omitted from display
    #[serde(default)]
    pub epoch: u32,

    /// Owning repository name
    #[serde(default)]
    pub repo: Option<String>,

    /// Installed size in bytes
    #[serde(default)]
    pub install_size: u64,

    /// Size as shown to the user, filled in by the engine
    #[serde(default)]
    pub formatted_size: Option<String>,
}

impl PackageInfo {
    /// Create a package with the given name, version, release and arch
    pub fn new(name: &str, version: &str, release: &str, arch: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            arch: Some(arch.to_string()),
            version: version.to_string(),
            release: release.to_string(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn arch(&self) -> &str {
        self.arch.as_deref().unwrap_or("")
    }

    /// Get the full version string, with the epoch only when it is set
    pub fn full_version(&self) -> String {
        if self.epoch != 0 {
            format!("{}:{}-{}", self.epoch, self.version, self.release)
        } else {
            format!("{}-{}", self.version, self.release)
        }
    }

    /// Compare epoch, version and release
    pub fn evr_cmp(&self, other: &PackageInfo) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| compare_versions(&self.version, &other.version))
            .then_with(|| compare_versions(&self.release, &other.release))
    }
}

/// Compare two version strings segment by segment.
///
/// Segments are runs of digits or letters; everything else separates them.
/// Numeric segments compare as numbers and sort after alphabetic ones.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left = split_segments(a);
    let right = split_segments(b);

    for (l, r) in left.iter().zip(right.iter()) {
        let l_num = l.chars().all(|c| c.is_ascii_digit());
        let r_num = r.chars().all(|c| c.is_ascii_digit());

        let ord = match (l_num, r_num) {
            (true, true) => {
                let l = l.trim_start_matches('0');
                let r = r.trim_start_matches('0');
                l.len().cmp(&r.len()).then_with(|| l.cmp(r))
            }
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => l.cmp(r),
        };

        if ord != Ordering::Equal {
            return ord;
        }
    }

    left.len().cmp(&right.len())
}

fn split_segments(s: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start: Option<usize> = None;
    let mut digits = false;

    for (i, c) in s.char_indices() {
        if c.is_ascii_alphanumeric() {
            let is_digit = c.is_ascii_digit();
            match start {
                Some(st) if is_digit != digits => {
                    segments.push(&s[st..i]);
                    start = Some(i);
                }
                None => start = Some(i),
                _ => {}
            }
            digits = is_digit;
        } else if let Some(st) = start.take() {
            segments.push(&s[st..i]);
        }
    }

    if let Some(st) = start {
        segments.push(&s[st..]);
    }

    segments
}

/// Result of resolving one alteration request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlan {
    /// Alteration this plan was resolved for
    pub alter_type: AlterType,

    /// Whether applying the plan changes anything
    pub need_action: bool,

    /// Whether applying the plan requires downloads
    pub need_download: bool,

    /// Requested names the resolver could not match
    pub not_resolved: Vec<String>,

    /// Already installed, skipped
    pub existing: Vec<PackageInfo>,
    pub not_available: Vec<PackageInfo>,
    pub to_install: Vec<PackageInfo>,
    pub to_upgrade: Vec<PackageInfo>,
    pub to_downgrade: Vec<PackageInfo>,
    pub to_remove: Vec<PackageInfo>,
    /// Removed because nothing needs them any more
    pub unneeded: Vec<PackageInfo>,
    pub to_reinstall: Vec<PackageInfo>,
    pub obsoleted: Vec<PackageInfo>,
}

impl ResolvedPlan {
    /// Create an empty plan for the given alteration
    pub fn new(alter_type: AlterType) -> Self {
        Self {
            alter_type,
            need_action: false,
            need_download: false,
            not_resolved: Vec::new(),
            existing: Vec::new(),
            not_available: Vec::new(),
            to_install: Vec::new(),
            to_upgrade: Vec::new(),
            to_downgrade: Vec::new(),
            to_remove: Vec::new(),
            unneeded: Vec::new(),
            to_reinstall: Vec::new(),
            obsoleted: Vec::new(),
        }
    }

    /// Alteration tables in display order, paired with the type whose header they use
    pub fn tables(&self) -> [(&[PackageInfo], AlterType); 7] {
        [
            (self.to_install.as_slice(), AlterType::Install),
            (self.to_upgrade.as_slice(), AlterType::Upgrade),
            (self.to_downgrade.as_slice(), AlterType::Downgrade),
            (self.to_remove.as_slice(), AlterType::Erase),
            (self.unneeded.as_slice(), AlterType::Erase),
            (self.to_reinstall.as_slice(), AlterType::Reinstall),
            (self.obsoleted.as_slice(), AlterType::Obsoleted),
        ]
    }

    /// Recompute the action and download flags from the package lists
    pub fn update_flags(&mut self) {
        self.need_download = !(self.to_install.is_empty()
            && self.to_upgrade.is_empty()
            && self.to_downgrade.is_empty()
            && self.to_reinstall.is_empty());
        self.need_action = self.need_download
            || !self.to_remove.is_empty()
            || !self.unneeded.is_empty()
            || !self.obsoleted.is_empty();
    }

    /// Number of packages the plan would touch
    pub fn change_count(&self) -> usize {
        self.tables().iter().map(|(pkgs, _)| pkgs.len()).sum()
    }
}
