//! Upgrade detection across package lists.
//!
//! A package list has one `name version` pair per line, for example the
//! output of `dpkg-query -W`. Duplicate candidates for the same package are
//! collapsed to the newest one, and a candidate only counts as an upgrade
//! when it is strictly newer than what is installed.

use crate::config::DpkgverConfig;
use crate::version::Version;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

// Captures: 1=package name, 2=version, 3=anything left over
static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^\s#]+)(?:\s+([^\s#]+))?(?:\s+([^#]*?))?\s*(?:#.*)?$")
        .expect("Invalid regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListError {
    #[error("line {line}: package '{package}' has no version")]
    MissingVersion { line: usize, package: String },
    #[error("line {line}: unexpected text after version: '{extra}'")]
    Malformed { line: usize, extra: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageVersion {
    pub package: String,
    pub version: Version,
}

impl PackageVersion {
    pub fn new(package: impl Into<String>, version: impl Into<Version>) -> Self {
        Self {
            package: package.into(),
            version: version.into(),
        }
    }
}

/// A candidate newer than the installed version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Upgrade {
    pub package: String,
    pub installed: Version,
    pub available: Version,
}

#[derive(Debug, Default, Serialize)]
pub struct UpgradeReport {
    pub upgrades: Vec<Upgrade>,
    /// Installed packages whose newest candidate is not newer
    pub up_to_date: usize,
    /// Upgradable packages skipped because they are on hold
    pub held: Vec<String>,
    /// Upgradable packages skipped because the candidate is above the pin
    pub pinned: Vec<String>,
    /// Candidates for packages that are not installed
    pub not_installed: usize,
}

/// Parse a `name version` list. Blank lines and `#` comments are skipped.
pub fn parse_package_list(content: &str) -> Result<Vec<PackageVersion>, ListError> {
    let mut entries = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some(caps) = LINE_RE.captures(line) else {
            return Err(ListError::Malformed {
                line: line_no,
                extra: trimmed.to_string(),
            });
        };

        let package = caps[1].to_string();
        let Some(version) = caps.get(2) else {
            return Err(ListError::MissingVersion {
                line: line_no,
                package,
            });
        };
        if let Some(extra) = caps.get(3).filter(|m| !m.as_str().is_empty()) {
            return Err(ListError::Malformed {
                line: line_no,
                extra: extra.as_str().to_string(),
            });
        }

        entries.push(PackageVersion::new(package, version.as_str()));
    }

    Ok(entries)
}

pub fn read_package_list(path: &Path) -> Result<Vec<PackageVersion>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read package list {}", path.display()))?;
    parse_package_list(&content).with_context(|| format!("Invalid package list {}", path.display()))
}

/// Keep only the newest version seen for each package.
/// When two entries compare equal the first one is kept.
pub fn newest_by_package<I>(entries: I) -> BTreeMap<String, Version>
where
    I: IntoIterator<Item = PackageVersion>,
{
    let mut newest: BTreeMap<String, Version> = BTreeMap::new();

    for entry in entries {
        match newest.entry(entry.package) {
            Entry::Occupied(mut slot) => {
                if entry.version.is_newer_than(slot.get()) {
                    slot.insert(entry.version);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(entry.version);
            }
        }
    }

    newest
}

/// Compare the newest available candidate of each package against what is
/// installed.
pub fn find_upgrades<I>(
    installed: &BTreeMap<String, Version>,
    available: I,
    config: &DpkgverConfig,
) -> UpgradeReport
where
    I: IntoIterator<Item = PackageVersion>,
{
    let mut report = UpgradeReport::default();

    // Candidates above a pin never take part, so an older allowed one can win
    let mut allowed = Vec::new();
    for candidate in available {
        if config.pin_allows(&candidate.package, candidate.version.as_str()) {
            allowed.push(candidate);
        } else if installed
            .get(&candidate.package)
            .is_some_and(|current| candidate.version.is_newer_than(current))
            && !report.pinned.contains(&candidate.package)
        {
            report.pinned.push(candidate.package);
        }
    }

    for (package, candidate) in newest_by_package(allowed) {
        let Some(current) = installed.get(&package) else {
            report.not_installed += 1;
            continue;
        };

        if !candidate.is_newer_than(current) {
            report.up_to_date += 1;
        } else if config.is_held(&package) {
            report.held.push(package);
        } else {
            report.upgrades.push(Upgrade {
                package,
                installed: current.clone(),
                available: candidate,
            });
        }
    }

    // Only report a pin when it actually kept the package back
    report.pinned.retain(|package| {
        !report.upgrades.iter().any(|u| &u.package == package) && !report.held.contains(package)
    });
    report.pinned.sort();

    report
}
