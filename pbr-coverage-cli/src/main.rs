//! PBR coverage checker CLI

use clap::{Parser, Subcommand};
use pbr_coverage_core::{
    load_mods_dir, load_modlist, texture_key, CoverageChecker, CoverageReport, ModEntry, ScanConfig,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pbr-coverage")]
#[command(about = "Find texture mods made redundant by PBR replacers. Offline, read-only.")]
#[command(version = concat!("v", env!("CARGO_PKG_VERSION")))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (TOML). Can set mods_dir, modlist and [scan] options.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging (same as RUST_LOG=pbr_coverage=debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// CLI config file contents
#[derive(Debug, Default, serde::Deserialize)]
struct CliConfig {
    mods_dir: Option<PathBuf>,
    modlist: Option<PathBuf>,
    #[serde(default)]
    scan: ScanConfig,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan enabled mods and report PBR coverage
    Check {
        /// Folder containing one subfolder per mod
        #[arg(long)]
        mods_dir: Option<PathBuf>,
        /// Mod Organizer modlist.txt; only +enabled mods are scanned
        #[arg(long)]
        modlist: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Write the JSON report to file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the scan log to stderr
        #[arg(long)]
        debug_log: bool,
        /// Scan mods one at a time
        #[arg(long)]
        sequential: bool,
    },
    /// Print the base texture identity of one or more texture paths
    Identity {
        #[arg(value_name = "PATH", num_args = 1..)]
        paths: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "pbr_coverage=debug,pbr_coverage_core=debug" } else { "pbr_coverage=info,pbr_coverage_core=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_cli_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            mods_dir,
            modlist,
            json,
            output,
            debug_log,
            sequential,
        } => {
            let mods_dir = mods_dir
                .or(config.mods_dir)
                .ok_or("No mods folder given. Use --mods-dir or set mods_dir in --config.")?;
            let modlist = modlist.or(config.modlist);
            let scan = if sequential { config.scan.sequential() } else { config.scan };
            cmd_check(&mods_dir, modlist.as_deref(), scan, json, output.as_deref(), debug_log)
        }
        Commands::Identity { paths } => {
            cmd_identity(&paths);
            Ok(())
        }
    }
}

fn load_cli_config(path: Option<&Path>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(CliConfig::default());
    };
    let s = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    let config = toml::from_str::<CliConfig>(&s)
        .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
    Ok(config)
}

fn enabled_mods(mods_dir: &Path, modlist: Option<&Path>) -> Result<Vec<ModEntry>, Box<dyn std::error::Error>> {
    if !mods_dir.is_dir() {
        return Err(format!("Not a directory: {}", mods_dir.display()).into());
    }
    let mods = match modlist {
        Some(list) => load_modlist(mods_dir, list)?,
        None => load_mods_dir(mods_dir)?,
    };
    Ok(mods)
}

fn cmd_check(
    mods_dir: &Path,
    modlist: Option<&Path>,
    scan: ScanConfig,
    json: bool,
    output: Option<&Path>,
    debug_log: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mods = enabled_mods(mods_dir, modlist)?;
    if mods.is_empty() {
        return Err(format!("No enabled mods found under \"{}\"", mods_dir.display()).into());
    }
    tracing::info!("Checking PBR coverage for {} mods in {}", mods.len(), mods_dir.display());

    let run = CoverageChecker::new(scan).run(&mods);
    let report = CoverageReport::from_run(&run);

    if debug_log {
        for line in &run.debug_log {
            eprintln!("{}", line);
        }
    }

    if let Some(path) = output {
        std::fs::write(path, report.to_json()?)?;
        println!("Wrote coverage report to {}", path.display());
    }

    if json {
        println!("{}", report.to_json()?);
    } else if output.is_none() {
        println!("{}", report.to_text());
    }
    Ok(())
}

fn cmd_identity(paths: &[String]) {
    for path in paths {
        println!("{} -> {}", path, texture_key(path));
    }
}
