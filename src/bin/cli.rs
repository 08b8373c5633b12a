// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Roadmesh CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use roadmesh::builder::{LaneTopology, LineCache, NoProgress, ProgressObserver};
use roadmesh::cli::{Reporter, TerminalProgress};
use roadmesh::config::SETTINGS_FILE;
use roadmesh::{io, MapData, MapMeshBuilder, MapSource, MeshSettings};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roadmesh")]
#[command(about = "Roadmesh - road surface and lane marking meshes from HD maps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build meshes from a JSON map and write glTF
    Build {
        /// Input map JSON file
        input: PathBuf,

        /// Output file (.gltf or .glb)
        #[arg(short, long)]
        output: PathBuf,

        /// Settings file (defaults to roadmesh.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Also write a JSON build report
        #[arg(long)]
        report: Option<PathBuf>,

        /// Disable lane end welding
        #[arg(long)]
        no_snap: bool,

        /// Disable pushing road edges outward
        #[arg(long)]
        no_push: bool,

        /// Build lane meshes in parallel
        #[arg(long)]
        parallel: bool,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Validate a map without building meshes
    Check {
        /// Input map JSON file
        input: PathBuf,
    },

    /// Write a settings file with default values
    InitConfig {
        /// Destination path
        #[arg(default_value = SETTINGS_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            input,
            output,
            config,
            report,
            no_snap,
            no_push,
            parallel,
            quiet,
        } => {
            let mut settings = load_settings(config.as_deref())?;
            settings.snap_lane_ends &= !no_snap;
            settings.push_outer_verts &= !no_push;
            settings.parallel |= parallel;
            build_command(&input, &output, report.as_deref(), settings, quiet)?;
        }
        Commands::Check { input } => {
            check_command(&input)?;
        }
        Commands::InitConfig { path, force } => {
            init_config_command(&path, force)?;
        }
        Commands::Version => {
            println!("Roadmesh v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "roadmesh=debug" } else { "roadmesh=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(config: Option<&Path>) -> Result<MeshSettings> {
    match config {
        Some(path) => {
            let mut settings = MeshSettings::from_file(path)?;
            settings.apply_env_overrides()?;
            settings.validate()?;
            Ok(settings)
        }
        None => MeshSettings::load(),
    }
}

fn build_command(
    input: &Path,
    output: &Path,
    report_path: Option<&Path>,
    settings: MeshSettings,
    quiet: bool,
) -> Result<()> {
    if !input.exists() {
        Reporter::report_error(&format!("Input file not found: {}", input.display()));
        std::process::exit(1);
    }

    let map = MapData::from_file(input)?;
    let builder = MapMeshBuilder::new(settings)?;

    let start = std::time::Instant::now();
    let mut meshes = Vec::new();
    let mut terminal = TerminalProgress::new();
    let mut silent = NoProgress;
    let observer: &mut dyn ProgressObserver = if quiet { &mut silent } else { &mut terminal };

    let report = builder
        .build(&map, &mut meshes, observer)
        .with_context(|| format!("Failed to build meshes for {}", input.display()))?;

    io::export_gltf(&meshes, output)?;
    if let Some(path) = report_path {
        io::write_report(&report, path)?;
    }

    Reporter::report_build(
        &input.display().to_string(),
        &output.display().to_string(),
        &report,
        start.elapsed(),
    );
    Ok(())
}

fn check_command(input: &Path) -> Result<()> {
    let map = MapData::from_file(input)?;

    let mut cache = LineCache::new();
    match LaneTopology::prepare(&map, &mut cache) {
        Ok(topology) => {
            Reporter::report_map(
                &input.display().to_string(),
                topology.len(),
                cache.len(),
                map.intersections().len(),
            );
            let orphans = map.lines.len().saturating_sub(cache.len());
            if orphans > 0 {
                Reporter::report_warning(&format!("{} lines are not referenced by any lane or intersection", orphans));
            }
            Reporter::success("Map is consistent");
            Ok(())
        }
        Err(err) => {
            Reporter::report_error(&err.to_string());
            std::process::exit(1);
        }
    }
}

fn init_config_command(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    MeshSettings::default().save(path)?;
    Reporter::report_info(&format!("Wrote default settings to {}", path.display()));
    Ok(())
}
