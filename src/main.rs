use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead};
use std::path::Path;
use std::process::ExitCode;

use dpkgver::cli::{Cli, Command};
use dpkgver::config::DpkgverConfig;
use dpkgver::relation::{Relation, RelationError};
use dpkgver::upgrade::{UpgradeReport, find_upgrades, newest_by_package, read_package_list};
use dpkgver::version::{compare_versions, newest, sort_versions};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Handle no-color flag
    if cli.no_color {
        colored::control::set_override(false);
    }

    match &cli.command {
        Some(Command::Compare { a, b }) => {
            let ord = compare_versions(a.as_bytes(), b.as_bytes());
            if cli.verbose {
                eprintln!("{}", format!("{} {:?} {}", a, ord, b).cyan());
            }
            println!("{}", ord as i32);
        }
        Some(Command::Check { a, relation, b }) => {
            let result = check_relation(a, relation, b);
            match &result {
                Ok(holds) if cli.verbose => {
                    let verdict = if *holds { "true".green() } else { "false".red() };
                    eprintln!("{} {} {}: {}", a, relation, b, verdict);
                }
                Ok(_) => {}
                Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
            }
            return Ok(ExitCode::from(check_status(&result)));
        }
        Some(Command::Sort { versions, reverse }) => {
            let mut versions = collect_versions(versions)?;
            sort_versions(&mut versions);
            if *reverse {
                versions.reverse();
            }
            for v in versions {
                println!("{}", v);
            }
        }
        Some(Command::Newest { versions }) => {
            let versions = collect_versions(versions)?;
            match newest(versions.iter().map(String::as_str)) {
                Some(v) => println!("{}", v),
                None => {
                    eprintln!("{}", "No versions given.".yellow());
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Some(Command::Upgrades {
            installed,
            available,
            json,
            check,
        }) => {
            let report = run_upgrades(&cli, installed, available)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            if *check && !report.upgrades.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Command::Version) | None => {
            println!("dpkgver version {}", VERSION);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Evaluate `a <relation> b`, failing only when the relation is unknown
fn check_relation(a: &str, relation: &str, b: &str) -> Result<bool, RelationError> {
    let relation: Relation = relation.parse()?;
    Ok(relation.holds(a, b))
}

/// Exit status of `check`, as `dpkg --compare-versions` reports it
fn check_status(result: &Result<bool, RelationError>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

/// Versions from the command line, or one per line from stdin
fn collect_versions(args: &[String]) -> Result<Vec<String>> {
    if !args.is_empty() {
        return Ok(args.to_vec());
    }

    let mut versions = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            versions.push(trimmed.to_string());
        }
    }
    Ok(versions)
}

fn load_config(cli: &Cli) -> Result<DpkgverConfig> {
    let cwd = std::env::current_dir()?;
    let (config, sources) =
        DpkgverConfig::resolve(&cwd, cli.config.as_deref()).map_err(anyhow::Error::msg)?;

    if cli.verbose {
        for path in &sources {
            eprintln!("{}", format!("Using config: {}", path.display()).cyan());
        }
        if !config.has_config() {
            eprintln!("{}", "No hold or pin settings".cyan());
        }
    }

    Ok(config)
}

fn run_upgrades(cli: &Cli, installed: &Path, available: &Path) -> Result<UpgradeReport> {
    let config = load_config(cli)?;

    let installed_list = read_package_list(installed)?;
    let available_list = read_package_list(available)?;
    if cli.verbose {
        eprintln!(
            "{}",
            format!(
                "Read {} installed and {} available entries",
                installed_list.len(),
                available_list.len()
            )
            .cyan()
        );
    }

    let installed = newest_by_package(installed_list);
    Ok(find_upgrades(&installed, available_list, &config))
}

fn print_report(report: &UpgradeReport) {
    for upgrade in &report.upgrades {
        println!(
            "  {} {} → {}",
            upgrade.package.bold(),
            upgrade.installed.to_string().dimmed(),
            upgrade.available.to_string().green()
        );
    }
    for package in &report.held {
        println!("  {} {}", package.bold(), "(held)".yellow());
    }
    for package in &report.pinned {
        println!("  {} {}", package.bold(), "(pinned)".yellow());
    }

    if report.upgrades.is_empty() {
        println!(
            "{} No upgrades available, {} package(s) up to date",
            "✓".green(),
            report.up_to_date
        );
    } else {
        println!(
            "{} package(s) can be upgraded, {} up to date",
            report.upgrades.len().to_string().green().bold(),
            report.up_to_date
        );
    }
}
