//! riskarea-cli — run the risk-area ingestion pipeline from a terminal
//!
//! Usage examples
//! --------------
//!
//! - Process a notification delivered by the object store
//!   $ riskarea-cli ingest --event notification.json
//!
//! - Same, reading objects from a local mirror and without touching the DB
//!   $ riskarea-cli ingest --local-root ./objects --dry-run < notification.json
//!
//! - Look at what a file would become
//!   $ riskarea-cli inspect setor-norte.kml
//!
//! Configuration
//! -------------
//!
//! `--config file.toml` (optional), then `RISKAREA_*` environment variables,
//! e.g. `RISKAREA_DATABASE_URL`, `RISKAREA_TARGET_TABLE`,
//! `RISKAREA_POOL__POOL_SIZE`. Logs go to stderr (`RUST_LOG` filters them);
//! stdout only carries results.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::{bail, Context, Result};
use clap::Parser;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use riskarea_core::normalize::normalize;
use riskarea_core::{
    archive, loader, FileFormat, IngestConfig, Ingestor, LocalSource, MemorySink, ObjectSource,
    RecordSink, TriggerEvent,
};
use std::io::Read;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Commands::Ingest {
            event,
            local_root,
            dry_run,
        } => {
            let event = read_event(&event)?;

            let source: Box<dyn ObjectSource> = match local_root {
                Some(root) => Box::new(LocalSource::new(root)),
                None => s3_source(&config)?,
            };

            if dry_run {
                let ingestor = Ingestor::new(
                    source,
                    MemorySink::new(config.target_table.clone()),
                    config,
                );
                let result = ingestor.handle(&event);
                for row in ingestor.sink().rows() {
                    println!("{}", serde_json::to_string(&row.to_geojson())?);
                }
                finish(&result)
            } else {
                let sink = postgis_sink(&config)?;
                let ingestor = Ingestor::new(source, sink, config);
                finish(&ingestor.handle(&event))
            }
        }

        Commands::Inspect { path } => inspect(&path, &config),
    }
}

/// Defaults <- optional TOML file <- RISKAREA_* environment.
fn load_config(path: Option<&Path>) -> Result<IngestConfig> {
    let mut figment = Figment::from(figment::providers::Serialized::defaults(
        IngestConfig::default(),
    ));
    if let Some(path) = path {
        if !path.exists() {
            bail!("configuration file {} does not exist", path.display());
        }
        tracing::info!(config_path = %path.display(), "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    }

    let config: IngestConfig = figment
        .merge(Env::prefixed("RISKAREA_").split("__"))
        .extract()
        .context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    if config.database_url.is_empty() {
        tracing::warn!("RISKAREA_DATABASE_URL is empty; database writes will fail");
    }
    Ok(config)
}

fn read_event(source: &str) -> Result<TriggerEvent> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read notification from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read notification {source}"))?
    };
    serde_json::from_str(&text).context("notification is not valid JSON")
}

#[cfg(feature = "s3")]
fn s3_source(config: &IngestConfig) -> Result<Box<dyn ObjectSource>> {
    let source = riskarea_core::S3Source::from_env(&config.region)
        .context("failed to initialize S3 client")?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "s3"))]
fn s3_source(_config: &IngestConfig) -> Result<Box<dyn ObjectSource>> {
    bail!("built without the 's3' feature; pass --local-root")
}

#[cfg(feature = "postgis")]
fn postgis_sink(config: &IngestConfig) -> Result<Box<dyn RecordSink>> {
    let sink = riskarea_core::PostGisSink::new(config).context("invalid sink configuration")?;
    Ok(Box::new(sink))
}

#[cfg(not(feature = "postgis"))]
fn postgis_sink(_config: &IngestConfig) -> Result<Box<dyn RecordSink>> {
    bail!("built without the 'postgis' feature; use --dry-run")
}

/// Prints the invocation result; a failure result becomes a non-zero exit.
fn finish(result: &riskarea_core::InvocationResult) -> Result<()> {
    println!("{}", serde_json::to_string(result)?);
    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn inspect(path: &Path, config: &IngestConfig) -> Result<()> {
    let scratch =
        archive::scratch_dir(&config.scratch_dir).context("failed to create scratch directory")?;
    let members = archive::expand(path, scratch.path())
        .with_context(|| format!("failed to expand {}", path.display()))?;

    for member in members {
        let Some(format) = FileFormat::from_path(&member) else {
            eprintln!("skipped {} (unsupported extension)", member.display());
            continue;
        };
        let collection = loader::load(&member, format)
            .with_context(|| format!("failed to load {}", member.display()))?;
        let record = normalize(&collection)
            .with_context(|| format!("failed to normalize {}", member.display()))?;
        println!("{}", serde_json::to_string(&record.to_geojson())?);
    }
    Ok(())
}

