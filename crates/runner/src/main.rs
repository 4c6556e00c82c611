//! Sheetsmith Runner - Main entry point.
//!
//! This crate is the *composition root* for the configuration core: it wires
//! the filesystem document source into the configuration manager, loads and
//! cross-validates the documents, and reconciles a persisted character
//! record against the result.
//!
//! Usage: `sheetsmith <config-dir> [record-file]`

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sheetsmith_domain::{format_errors, needs_sync, sync, CharacterRecord};
use sheetsmith_engine::{deserialize_record, serialize_record, ConfigService, FsDocumentSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheetsmith=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let config_dir: PathBuf = match args.next() {
        Some(dir) => dir.into(),
        None => {
            eprintln!("Usage: sheetsmith <config-dir> [record-file]");
            std::process::exit(2);
        }
    };
    let record_path: Option<PathBuf> = args.next().map(Into::into);

    tracing::info!(config_dir = %config_dir.display(), "Starting Sheetsmith");

    let service = ConfigService::new(Arc::new(FsDocumentSource::new(&config_dir)));
    let config = match service.load_all().await {
        Ok(config) => config,
        Err(error) => {
            // The formatted report is the user-facing contract; print it raw.
            println!("{}", format_errors(error.validation_errors()));
            std::process::exit(1);
        }
    };
    tracing::info!(
        attributes = config.attributes().attributes.len(),
        enums = config.enums().enums.len(),
        tabs = config.inventory().tabs.len(),
        "configuration resolved"
    );
    println!("{}", format_errors(&[]));

    let record = match &record_path {
        Some(path) if path.exists() => {
            let text = tokio::fs::read_to_string(path).await?;
            deserialize_record(&text)?
        }
        _ => CharacterRecord::new(),
    };

    if needs_sync(&record, &config) {
        tracing::info!("record out of sync with configuration, reconciling");
    } else {
        tracing::info!("record already in sync");
    }
    let synced = sync(&record, &config);

    if let Some(path) = record_path {
        tokio::fs::write(&path, serialize_record(&synced)?).await?;
        tracing::info!(record = %path.display(), "record written");
    }

    Ok(())
}
