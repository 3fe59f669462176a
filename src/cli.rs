use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dpkgver")]
#[command(
    author,
    version,
    about = "Compare, sort and check Debian package versions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file merged over the discovered .dpkgverrc.toml, dpkgver.toml, or .dpkgverrc
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print -1, 0 or 1 as A is older than, equal to, or newer than B
    Compare {
        /// First version
        a: String,
        /// Second version
        b: String,
    },

    /// Exit with status 0 if the relation holds, 1 if not, 2 if it is unknown
    Check {
        /// Left-hand version
        a: String,
        /// Relation: lt le eq ne ge gt (or lt-nl ..), << <= = != >= >>
        relation: String,
        /// Right-hand version
        b: String,
    },

    /// Sort versions, oldest first (reads stdin when none are given)
    Sort {
        /// Versions to sort
        versions: Vec<String>,

        /// Newest first
        #[arg(short, long)]
        reverse: bool,
    },

    /// Print the newest version (reads stdin when none are given)
    Newest {
        /// Versions to choose from
        versions: Vec<String>,
    },

    /// List packages with a newer version available
    Upgrades {
        /// File of installed `package version` lines
        installed: PathBuf,
        /// File of available `package version` lines
        available: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Exit with code 1 if upgrades are available
        #[arg(short = 'c', long)]
        check: bool,
    },

    /// Show version information
    Version,
}
