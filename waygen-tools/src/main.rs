#![cfg_attr(feature = "precommit-checks", deny(warnings, clippy::pedantic, clippy::dbg_macro))]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser)]
#[clap(version, about)]
struct Options {
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Generate waypoints from a session file with settings and a shape.
    Plan {
        input:      PathBuf,
        output:     PathBuf,
        /// Cap the speed so that the camera can fire on every leg.
        #[clap(long)]
        safe_speed: bool,
    },
    /// Package a mission file into a KMZ archive.
    Export {
        input:      PathBuf,
        /// Mission name, sanitized into the archive file name.
        #[clap(long)]
        name:       String,
        #[clap(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Convert a KMZ archive or KML/WPML document into a mission file.
    Import { input: PathBuf, output: PathBuf },
    /// Print the speed limit and flight time estimate of a mission file.
    Assess { input: PathBuf },
    /// Write the JSON schema of session files.
    Schema {
        output: PathBuf,
        #[clap(long)]
        gzip:   bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Options::parse().command {
        Command::Plan { input, output, safe_speed } => {
            let mission = waygen_tools::plan(&input, &output, safe_speed)?;
            tracing::info!("Planned {} waypoints", mission.waypoints.len());
        }
        Command::Export { input, name, output_dir } => {
            waygen_tools::export(&input, &output_dir, &name)?;
        }
        Command::Import { input, output } => {
            let mission = waygen_tools::import(&input, &output)?;
            tracing::info!("Imported {} waypoints", mission.waypoints.len());
        }
        Command::Assess { input } => {
            let report = waygen_tools::assess(&input)?;
            serde_json::to_writer_pretty(std::io::stdout(), &report).context("print report")?;
            println!();
        }
        Command::Schema { output, gzip } => waygen_tools::json_schema(&output, gzip)?,
    }

    Ok(())
}
