//! Configuration file support for dpkgver
//!
//! Supports `.dpkgverrc.toml`, `dpkgver.toml` and `.dpkgverrc` files.
//!
//! Example configuration:
//! ```toml
//! # Packages never reported as upgradable
//! hold = [
//!     "libc6",
//!     "linux-image-generic",
//! ]
//!
//! # Highest version accepted for a package
//! [pin]
//! openssl = "3.0.13-0ubuntu3"
//! python3 = "3.12~"  # anything below 3.12
//! ```

use crate::version::compare_versions;
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Maximum size for config files (1 MB)
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

const CONFIG_NAMES: [&str; 3] = [".dpkgverrc.toml", "dpkgver.toml", ".dpkgverrc"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DpkgverConfig {
    /// Packages that are never upgraded
    #[serde(default)]
    pub hold: Vec<String>,

    /// Package name -> highest acceptable version
    #[serde(default)]
    pub pin: HashMap<String, String>,
}

impl DpkgverConfig {
    /// Search `start_dir` and its parents for the closest config file
    pub fn discover(start_dir: &Path) -> Option<(Self, PathBuf)> {
        start_dir.ancestors().find_map(|dir| {
            CONFIG_NAMES.iter().find_map(|name| {
                let config_path = dir.join(name);
                if !config_path.exists() {
                    return None;
                }
                Self::load_from_path(&config_path).map(|config| (config, config_path))
            })
        })
    }

    /// The config discovered from `start_dir` with an explicitly given file
    /// merged over it. Also returns the files used, in merge order.
    pub fn resolve(
        start_dir: &Path,
        explicit: Option<&Path>,
    ) -> Result<(Self, Vec<PathBuf>), String> {
        let mut sources = Vec::new();
        let mut config = match Self::discover(start_dir) {
            Some((config, path)) => {
                sources.push(path);
                config
            }
            None => Self::default(),
        };

        if let Some(path) = explicit {
            config.merge(Self::load_from_path_with_error(path)?);
            sources.push(path.to_path_buf());
        }

        Ok((config, sources))
    }

    /// Load a config file, discarding the reason on failure (for auto-discovery)
    pub fn load_from_path(path: &Path) -> Option<Self> {
        Self::load_from_path_with_error(path).ok()
    }

    /// Load a config file given explicitly, reporting why it could not be used
    pub fn load_from_path_with_error(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Err(format!("Config file not found: {}", path.display()));
        }

        let metadata = std::fs::metadata(path).map_err(|e| {
            format!(
                "Cannot read config file metadata: {}. Check file permissions.",
                e
            )
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(format!(
                "Config file too large: {} bytes (max {} MB)",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE / 1024 / 1024
            ));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                format!(
                    "Permission denied reading config file: {}. Check file permissions.",
                    path.display()
                )
            } else {
                format!("Failed to read config file {}: {}", path.display(), e)
            }
        })?;

        toml::from_str(&content)
            .map_err(|e| format!("Invalid TOML in config file {}:\n  {}", path.display(), e))
    }

    pub fn is_held(&self, package: &str) -> bool {
        self.hold.iter().any(|p| p == package)
    }

    pub fn pinned_version(&self, package: &str) -> Option<&str> {
        self.pin.get(package).map(|s| s.as_str())
    }

    /// Check a candidate version against the package's pin, if it has one
    pub fn pin_allows(&self, package: &str, version: &str) -> bool {
        match self.pinned_version(package) {
            Some(ceiling) => {
                compare_versions(version.as_bytes(), ceiling.as_bytes()) != Ordering::Greater
            }
            None => true,
        }
    }

    pub fn has_config(&self) -> bool {
        !self.hold.is_empty() || !self.pin.is_empty()
    }

    /// Merge another configuration into this one (other takes precedence)
    pub fn merge(&mut self, other: Self) {
        for pkg in other.hold {
            if !self.hold.contains(&pkg) {
                self.hold.push(pkg);
            }
        }
        self.pin.extend(other.pin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn pins(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_load_config_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(".dpkgverrc.toml");

        let content = r#"
hold = ["libc6", "grub-pc"]

[pin]
openssl = "3.0.13-0ubuntu3"
python3 = "3.12~"
"#;
        fs::write(&config_path, content).unwrap();

        let config = DpkgverConfig::load_from_path(&config_path).unwrap();

        assert_eq!(config.hold, vec!["libc6".to_string(), "grub-pc".to_string()]);
        assert_eq!(config.pin.len(), 2);
        assert_eq!(config.pinned_version("openssl"), Some("3.0.13-0ubuntu3"));
        assert_eq!(config.pinned_version("python3"), Some("3.12~"));
        assert_eq!(config.pinned_version("curl"), None);
    }

    #[test]
    fn test_is_held() {
        let config = DpkgverConfig {
            hold: vec!["libc6".to_string()],
            pin: HashMap::new(),
        };

        assert!(config.is_held("libc6"));
        assert!(!config.is_held("libc6-dev"));
    }

    #[test]
    fn test_pin_allows_uses_dpkg_ordering() {
        let config = DpkgverConfig {
            hold: vec![],
            pin: pins(&[("python3", "3.12~"), ("openssl", "1:3.0")]),
        };

        assert!(config.pin_allows("python3", "3.11.9-1"));
        assert!(!config.pin_allows("python3", "3.12.0-1"));
        assert!(!config.pin_allows("python3", "3.12~rc1"));
        assert!(config.pin_allows("openssl", "3.1"));
        assert!(config.pin_allows("openssl", "1:3.0"));
        assert!(!config.pin_allows("openssl", "1:3.0-1"));
        assert!(config.pin_allows("curl", "99"));
    }

    #[test]
    fn test_discover_config_in_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("dpkgver.toml");
        fs::write(&config_path, "hold = [\"libc6\"]").unwrap();

        let (config, path) = DpkgverConfig::discover(temp_dir.path()).unwrap();
        assert!(config.is_held("libc6"));
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_config_in_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(".dpkgverrc.toml");
        let subdir = temp_dir.path().join("nested").join("deeper");
        fs::create_dir_all(&subdir).unwrap();
        fs::write(&config_path, "hold = [\"parent-pkg\"]").unwrap();

        let (config, path) = DpkgverConfig::discover(&subdir).unwrap();
        assert!(config.is_held("parent-pkg"));
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_prefers_closer_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".dpkgverrc.toml"),
            "hold = [\"parent-pkg\"]",
        )
        .unwrap();

        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        let child_config = subdir.join(".dpkgverrc");
        fs::write(&child_config, "hold = [\"child-pkg\"]").unwrap();

        let (config, path) = DpkgverConfig::discover(&subdir).unwrap();
        assert!(config.is_held("child-pkg"));
        assert!(!config.is_held("parent-pkg"));
        assert_eq!(path, child_config);
    }

    #[test]
    fn test_discover_skips_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".dpkgverrc.toml"), "hold = [").unwrap();
        fs::write(temp_dir.path().join("dpkgver.toml"), "hold = [\"ok\"]").unwrap();

        let (config, _) = DpkgverConfig::discover(temp_dir.path()).unwrap();
        assert!(config.is_held("ok"));
    }

    #[test]
    fn test_empty_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(".dpkgverrc.toml");
        fs::write(&config_path, "").unwrap();

        let config = DpkgverConfig::load_from_path(&config_path).unwrap();
        assert!(!config.has_config());
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");

        let err = DpkgverConfig::load_from_path_with_error(&missing).unwrap_err();
        assert!(err.contains("Config file not found"));
        assert!(err.contains("nope.toml"));
    }

    #[test]
    fn test_load_invalid_toml_reports_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("dpkgver.toml");
        fs::write(&config_path, "hold = \"not-a-list\"").unwrap();

        let err = DpkgverConfig::load_from_path_with_error(&config_path).unwrap_err();
        assert!(err.contains("Invalid TOML"));
    }

    #[test]
    fn test_load_oversized_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("dpkgver.toml");
        let padding = "#".repeat(MAX_CONFIG_FILE_SIZE as usize + 1);
        fs::write(&config_path, padding).unwrap();

        let err = DpkgverConfig::load_from_path_with_error(&config_path).unwrap_err();
        assert!(err.contains("too large"));
    }

    #[test]
    fn test_resolve_merges_explicit_over_discovered() {
        let temp_dir = TempDir::new().unwrap();
        let discovered = temp_dir.path().join(".dpkgverrc.toml");
        fs::write(
            &discovered,
            "hold = [\"libc6\"]\n[pin]\nopenssl = \"3.0\"\ncurl = \"8.5\"\n",
        )
        .unwrap();
        let explicit = temp_dir.path().join("override.toml");
        fs::write(&explicit, "hold = [\"grub-pc\"]\n[pin]\nopenssl = \"3.1\"\n").unwrap();

        let (config, sources) =
            DpkgverConfig::resolve(temp_dir.path(), Some(explicit.as_path())).unwrap();

        assert!(config.is_held("libc6"));
        assert!(config.is_held("grub-pc"));
        assert_eq!(config.pinned_version("openssl"), Some("3.1"));
        assert_eq!(config.pinned_version("curl"), Some("8.5"));
        assert_eq!(sources, vec![discovered, explicit]);
    }

    #[test]
    fn test_resolve_without_any_config() {
        let temp_dir = TempDir::new().unwrap();

        let (config, sources) = DpkgverConfig::resolve(temp_dir.path(), None).unwrap();
        assert!(!config.has_config());
        assert!(sources.is_empty());
    }

    #[test]
    fn test_resolve_reports_bad_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");

        let err = DpkgverConfig::resolve(temp_dir.path(), Some(missing.as_path())).unwrap_err();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn test_merge_configs() {
        let mut base = DpkgverConfig {
            hold: vec!["libc6".to_string()],
            pin: pins(&[("openssl", "3.0")]),
        };
        let other = DpkgverConfig {
            hold: vec!["libc6".to_string(), "grub-pc".to_string()],
            pin: pins(&[("openssl", "3.1"), ("curl", "8.5")]),
        };

        base.merge(other);

        assert_eq!(base.hold, vec!["libc6".to_string(), "grub-pc".to_string()]);
        assert_eq!(base.pinned_version("openssl"), Some("3.1"));
        assert_eq!(base.pinned_version("curl"), Some("8.5"));
    }
}
