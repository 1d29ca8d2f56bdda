//! Annotate a text file in one pass.

use std::path::Path;
use std::sync::Arc;

use fxlens_config::Config;
use fxlens_core::SharedDocument;
use fxlens_observer::Session;
use fxlens_rates::RateOrchestrator;
use tracing::info;

use crate::cmd_convert::normalize_currency;
use crate::page;

pub(crate) async fn run_scan(
    config: &Config,
    file: &Path,
    to: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(to) = to {
        config.settings.target_currency = normalize_currency(to);
    }

    let document = SharedDocument::new(page::load_document(file).await?);
    let converter = Arc::new(RateOrchestrator::from_config(&config));
    let session = Session::start(&config, document, converter, None).await?;

    let dispatched = session.settle_now();
    info!("Dispatched {} conversions from {}", dispatched, file.display());
    session.wait_idle().await;
    session.shutdown().await;

    for line in session.document().read(page::paragraphs) {
        println!("{}", line);
    }

    let stats = session.stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", "-".repeat(60));
        println!(
            "{} conversions, currencies: {}",
            stats.conversions_found,
            if stats.currencies.is_empty() {
                "-".to_string()
            } else {
                stats.currencies.join(", ")
            }
        );
    }
    Ok(())
}
