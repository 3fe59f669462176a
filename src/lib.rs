pub mod cli;
pub mod config;
pub mod ffi;
pub mod relation;
pub mod upgrade;
pub mod version;

pub use cli::{Cli, Command};
pub use config::DpkgverConfig;
pub use relation::{Relation, RelationError, RelationKind};
pub use upgrade::{PackageVersion, Upgrade, UpgradeReport, find_upgrades, newest_by_package};
pub use version::{
    ParsedVersion, Version, compare_segment, compare_version, compare_versions,
    is_version_greater_than, newest, sort_versions,
};
