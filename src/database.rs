//! SQLite database for installed and available package state

use std::path::Path;

use rusqlite::{params, Connection, Row};

use crate::error::Result;
use crate::package::PackageInfo;

/// Package state database
pub struct Database {
    conn: Connection,
}

const PACKAGE_COLUMNS: &str = "name, arch, version, release, epoch, repo, install_size";

impl Database {
    /// Open or create the database
    pub fn open(path: &Path) -> Result<Self> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize the database schema
    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            -- Installed packages, one version per name
            CREATE TABLE IF NOT EXISTS installed (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                arch TEXT NOT NULL,
                version TEXT NOT NULL,
                release TEXT NOT NULL,
                epoch INTEGER NOT NULL DEFAULT 0,
                repo TEXT NOT NULL,
                install_size INTEGER NOT NULL,
                install_date INTEGER NOT NULL
            );

            -- Packages that can be installed
            CREATE TABLE IF NOT EXISTS available (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                arch TEXT NOT NULL,
                version TEXT NOT NULL,
                release TEXT NOT NULL,
                epoch INTEGER NOT NULL DEFAULT 0,
                repo TEXT NOT NULL,
                install_size INTEGER NOT NULL,
                UNIQUE (name, arch, version, release, epoch)
            );

            CREATE INDEX IF NOT EXISTS idx_available_name ON available(name);
            "#,
        )?;
        Ok(())
    }

    /// Get an installed package by name
    pub fn get_installed(&self, name: &str) -> Result<Option<PackageInfo>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM installed WHERE name = ?1",
            PACKAGE_COLUMNS
        ))?;

        let mut rows = stmt.query_map(params![name], package_from_row)?;
        match rows.next() {
            Some(pkg) => Ok(Some(pkg?)),
            None => Ok(None),
        }
    }

    /// List all installed packages, ordered by name
    pub fn list_installed(&self) -> Result<Vec<PackageInfo>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM installed ORDER BY name",
            PACKAGE_COLUMNS
        ))?;

        let packages = stmt
            .query_map([], package_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(packages)
    }

    /// List every available version of a package
    pub fn available_versions(&self, name: &str) -> Result<Vec<PackageInfo>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM available WHERE name = ?1",
            PACKAGE_COLUMNS
        ))?;

        let packages = stmt
            .query_map(params![name], package_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(packages)
    }

    /// Add or replace an available package
    pub fn add_available(&self, pkg: &PackageInfo) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO available
                (name, arch, version, release, epoch, repo, install_size)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                pkg.name(),
                pkg.arch(),
                pkg.version,
                pkg.release,
                pkg.epoch,
                pkg.repo.as_deref().unwrap_or(""),
                pkg.install_size as i64,
            ],
        )?;
        Ok(())
    }

    /// Record a package as installed, replacing any installed version
    pub fn add_installed(&self, pkg: &PackageInfo) -> Result<()> {
        record_installed(&self.conn, pkg)
    }

    /// Apply installs and removals atomically.
    ///
    /// Either every change lands or none does.
    pub fn commit_changes(&mut self, install: &[&PackageInfo], remove: &[&PackageInfo]) -> Result<()> {
        let tx = self.conn.transaction()?;

        for pkg in remove {
            tx.execute("DELETE FROM installed WHERE name = ?1", params![pkg.name()])?;
        }
        for pkg in install {
            record_installed(&tx, pkg)?;
        }

        tx.commit()?;
        Ok(())
    }
}

fn record_installed(conn: &Connection, pkg: &PackageInfo) -> Result<()> {
    conn.execute(
        r#"
        INSERT OR REPLACE INTO installed
            (name, arch, version, release, epoch, repo, install_size, install_date)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            pkg.name(),
            pkg.arch(),
            pkg.version,
            pkg.release,
            pkg.epoch,
            pkg.repo.as_deref().unwrap_or(""),
            pkg.install_size as i64,
            chrono::Utc::now().timestamp(),
        ],
    )?;
    Ok(())
}

fn package_from_row(row: &Row<'_>) -> rusqlite::Result<PackageInfo> {
    let repo: String = row.get(5)?;
    let install_size: i64 = row.get(6)?;

    Ok(PackageInfo {
        name: Some(row.get(0)?),
        arch: Some(row.get(1)?),
        version: row.get(2)?,
        release: row.get(3)?,
        epoch: row.get(4)?,
        repo: if repo.is_empty() { None } else { Some(repo) },
        install_size: install_size.max(0) as u64,
        formatted_size: None,
    })
}
