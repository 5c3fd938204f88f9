//! Wirekit command line entry point
//!
//! # Usage
//!
//! ```bash
//! # Import with the built-in defaults (offset 10, 0, 0 on XOY)
//! wirekit profile.csv
//!
//! # Use a RON config and save the resulting document
//! wirekit --config import.ron --output profile.ron
//!
//! # Override the translation
//! wirekit profile.csv --dx 0 --dz -5
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use wk_cad::default_kernel;
use wk_core::{ImportConfig, Project, run_import};

#[derive(Parser)]
#[command(name = "wirekit")]
#[command(about = "Import a CSV point profile as a closed, translated wire", long_about = None)]
struct Cli {
    /// CSV file with x,y rows (overrides the config file)
    csv: Option<PathBuf>,

    /// RON import config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Save the resulting document as a RON project
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Translation along X
    #[arg(long, allow_negative_numbers = true)]
    dx: Option<f64>,

    /// Translation along Y
    #[arg(long, allow_negative_numbers = true)]
    dy: Option<f64>,

    /// Translation along Z
    #[arg(long, allow_negative_numbers = true)]
    dz: Option<f64>,
}

impl Cli {
    /// Merge the command line over the config file (or defaults)
    fn import_config(&self) -> anyhow::Result<ImportConfig> {
        let mut config = match &self.config {
            Some(path) => ImportConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ImportConfig::default(),
        };

        if let Some(csv) = &self.csv {
            config.csv_path = csv.clone();
        }
        for (axis, value) in [self.dx, self.dy, self.dz].into_iter().enumerate() {
            if let Some(value) = value {
                config.offset[axis] = value;
            }
        }

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wirekit=info,wk_core=info,wk_cad=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.import_config()?;

    let kernel = default_kernel();
    tracing::info!("Using {} kernel", kernel.name());

    let name = config
        .csv_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("profile")
        .to_string();
    let mut project = Project::new(name);

    let report = run_import(&config, kernel.as_ref(), &mut project.document)
        .with_context(|| format!("Failed to import {}", config.csv_path.display()))?;

    tracing::info!(
        "{} points, {} rows skipped, {} segments; wire '{}' translated by {} into '{}'",
        report.points.len(),
        report.skipped.len(),
        report.segments.len(),
        report.wire.name,
        config.offset(),
        report.translation.name
    );

    if let Some(output) = &cli.output {
        project
            .save(output)
            .with_context(|| format!("Failed to save {}", output.display()))?;
        tracing::info!("Saved project to {}", output.display());
    }

    Ok(())
}
