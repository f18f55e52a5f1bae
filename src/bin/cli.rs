// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! meshprep CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use meshprep::geometry::analyze;
use meshprep::io::report;
use meshprep::logging::init_logging;
use meshprep::pipeline::{prepare_mesh, solid_properties};
use meshprep::{load_mesh, PrepConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "meshprep")]
#[command(about = "Prepare morphed object meshes: dedup, repair, mass properties", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Preprocess every paired object and write the summary table
    Run {
        /// Configuration file (defaults to meshprep.toml if present)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Directory of object meshes
        #[arg(long, value_name = "DIR")]
        objects: Option<PathBuf>,

        /// Directory of morph parameter files
        #[arg(long, value_name = "DIR")]
        params: Option<PathBuf>,

        /// Output directory for converted meshes and the summary
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Show watertightness and mass properties of one mesh before and after repair
    Inspect {
        /// Mesh file (obj or stl)
        mesh: PathBuf,

        /// Configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Print or save the default configuration
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run {
            config,
            objects,
            params,
            output,
        }) => {
            let mut config = load_config(config)?;
            if let Some(dir) = objects {
                config.object_dir = dir;
            }
            if let Some(dir) = params {
                config.param_dir = dir;
            }
            if let Some(dir) = output {
                config.output_dir = dir;
            }
            run_command(&config, cli.verbose)?;
        }
        Some(Commands::Inspect { mesh, config }) => {
            let config = load_config(config)?;
            init_logging(&config.log_level, cli.verbose)?;
            inspect_command(&mesh, &config)?;
        }
        Some(Commands::Config { output }) => {
            config_command(output)?;
        }
        None => {
            // Flag-less invocation processes the configured dataset
            let config = load_config(None)?;
            run_command(&config, cli.verbose)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<PrepConfig> {
    match path {
        Some(path) => {
            let mut config = PrepConfig::from_file(&path)?;
            config.apply_env_overrides();
            Ok(config)
        }
        None => PrepConfig::load(),
    }
}

fn run_command(config: &PrepConfig, verbose: bool) -> Result<()> {
    init_logging(&config.log_level, verbose)?;

    println!("{}", "Mesh Preprocessing".bold().cyan());
    println!("  {} {}", "Objects:".white(), config.object_dir.display());
    println!("  {} {}", "Parameters:".white(), config.param_dir.display());
    println!("  {} {}", "Output:".white(), config.output_dir.display());

    let run_report = meshprep::run(config)?;
    report::print_summary_with_verbose(&run_report, verbose);

    if let Some(path) = config.report_path() {
        println!("  {} {}", "JSON report:".white(), path.display());
    }
    println!(
        "\n{} Number of processed mesh files: {}",
        "✓".green(),
        run_report.processed
    );
    Ok(())
}

fn inspect_command(path: &Path, config: &PrepConfig) -> Result<()> {
    let mesh = load_mesh(path).with_context(|| format!("Failed to load {:?}", path))?;
    analyze(&mesh, config.default_density).print("As loaded");

    match prepare_mesh(mesh, config) {
        Ok(prepared) => {
            let title = if prepared.repaired {
                "After repair"
            } else {
                "After vertex merge (no repair needed)"
            };
            analyze(&prepared.mesh, config.default_density).print(title);

            match solid_properties(&prepared.mesh, config) {
                Ok(properties) => {
                    let inertia =
                        properties.clamped_inertia(config.target_density, config.inertia_clamp);
                    println!("{}", "Summary row values".bold());
                    println!("  {} {}", "Mass:".white(), config.target_mass);
                    println!(
                        "  {} ({:?}, {:?}, {:?})",
                        "Center of mass:".white(),
                        properties.center_of_mass.x,
                        properties.center_of_mass.y,
                        properties.center_of_mass.z
                    );
                    for row in 0..3 {
                        println!(
                            "  {} [{:?}, {:?}, {:?}]",
                            "Inertia:".white(),
                            inertia[(row, 0)],
                            inertia[(row, 1)],
                            inertia[(row, 2)]
                        );
                    }
                    println!("{} usable", "✓".green());
                }
                Err(reason) => println!("{} {}", "✗".red(), reason),
            }
        }
        Err(reason) => println!("{} {}", "✗".red(), reason),
    }

    Ok(())
}

fn config_command(output: Option<PathBuf>) -> Result<()> {
    let config = PrepConfig::default();
    match output {
        Some(path) => {
            config.save(&path)?;
            println!("{} Wrote default configuration to {}", "✓".green(), path.display());
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}
