//! Package catalogs imported into the local state database
//!
//! A catalog is a TOML file with one `[[package]]` table per available
//! package version.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::package::PackageInfo;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub package: Vec<PackageInfo>,
}

impl Catalog {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse catalog: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(content)?;
        for (index, pkg) in catalog.package.iter().enumerate() {
            if pkg.name().is_empty() {
                bail!("package #{} has no name", index + 1);
            }
            if pkg.version.is_empty() || pkg.release.is_empty() {
                bail!("package {} needs a version and a release", pkg.name());
            }
        }
        Ok(catalog)
    }

    /// Add every package to the database's available set
    pub fn import(&self, db: &Database) -> Result<usize> {
        for pkg in &self.package {
            db.add_available(pkg)
                .with_context(|| format!("Failed to import {}", pkg.name()))?;
        }
        Ok(self.package.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
        [[package]]
        name = "foo"
        arch = "x86_64"
        version = "1.0"
        release = "1"
        repo = "base"
        install_size = 2048

        [[package]]
        name = "bar"
        arch = "noarch"
        version = "2.1"
        release = "3"
        epoch = 1
    "#;

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::parse(CATALOG).unwrap();
        assert_eq!(catalog.package.len(), 2);
        assert_eq!(catalog.package[1].epoch, 1);
        assert_eq!(catalog.package[1].repo, None);
        assert_eq!(catalog.package[0].full_version(), "1.0-1");
    }

    #[test]
    fn test_rejects_nameless_package() {
        let err = Catalog::parse("[[package]]\nversion = \"1\"\nrelease = \"1\"\n").unwrap_err();
        assert!(err.to_string().contains("has no name"));
    }

    #[test]
    fn test_import() {
        let db = Database::open_in_memory().unwrap();
        let count = Catalog::parse(CATALOG).unwrap().import(&db).unwrap();
        assert_eq!(count, 2);
        assert_eq!(db.available_versions("bar").unwrap()[0].epoch, 1);
    }
}
