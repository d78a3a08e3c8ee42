use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for riskarea-cli
#[derive(Debug, Parser)]
#[command(
    name = "riskarea",
    version,
    about = "Ingest risk-area boundary uploads into a PostGIS table"
)]
pub struct CliArgs {
    /// Optional TOML configuration file; RISKAREA_* environment variables override it
    #[arg(short = 'c', long = "config", env = "RISKAREA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Process one object-store notification (JSON) end to end
    Ingest {
        /// Path to the notification JSON, or '-' for stdin
        #[arg(short = 'e', long = "event", default_value = "-")]
        event: String,

        /// Serve objects from <ROOT>/<bucket>/<key> instead of S3
        #[arg(long = "local-root")]
        local_root: Option<PathBuf>,

        /// Normalize but do not write to the database; print rows as GeoJSON
        #[arg(long = "dry-run")]
        dry_run: bool,
    },

    /// Normalize a local geometry file or archive and print the rows as GeoJSON
    Inspect {
        /// File to inspect (.kml, .geojson, .shp, .zip, .gz)
        path: PathBuf,
    },
}
