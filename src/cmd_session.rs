//! Interactive session over JSON lines.
//!
//! Each stdin line is one message. Control requests (`toggleExtension`,
//! `rescan`, `getStats`, `updateSettings`) and host messages (`convertCurrency`) use
//! the same shapes as the message boundary. Two local messages edit the live
//! page: `{"type":"appendParagraph","text":"..."}` and `{"type":"render"}`.
//! Replies and `updateBadge` notifications are written to stdout.

use std::path::PathBuf;
use std::sync::Arc;

use fxlens_config::{Config, TomlSettingsStore};
use fxlens_core::{MemorySettingsStore, SharedDocument};
use fxlens_observer::Session;
use fxlens_protocols::{HostMessage, SettingsStore};
use fxlens_rates::{ConversionHost, RateOrchestrator};
use serde::Deserialize;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::page;

/// Messages handled by the CLI itself.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum PageCommand {
    AppendParagraph { text: String },
    Render,
}

pub(crate) struct SessionOptions {
    pub document: Option<PathBuf>,
    pub settings: Option<PathBuf>,
    pub no_persist: bool,
}

pub(crate) async fn run_session(config: &Config, options: SessionOptions) -> anyhow::Result<()> {
    let document = match &options.document {
        Some(path) => page::load_document(path).await?,
        None => fxlens_core::Document::new(),
    };
    let document = SharedDocument::new(document);

    let store: Arc<dyn SettingsStore> = if options.no_persist {
        Arc::new(MemorySettingsStore::new(config.settings.clone()))
    } else {
        let store = match &options.settings {
            Some(path) => TomlSettingsStore::new(path),
            None => TomlSettingsStore::default_location(),
        };
        info!("Persisting settings to {}", store.path().display());
        Arc::new(store.with_fallback(config.settings.clone()))
    };

    let orchestrator = Arc::new(RateOrchestrator::from_config(config));
    let host = ConversionHost::new(orchestrator.clone());
    let session = Session::start(config, document, orchestrator, Some(store)).await?;

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = out_rx.recv().await {
            let written = async {
                stdout.write_all(line.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await
            };
            if let Err(e) = written.await {
                warn!("Failed to write to stdout: {}", e);
                break;
            }
        }
    });

    let mut badge = session.badge();
    let badge_tx = out_tx.clone();
    let badge_task = tokio::spawn(async move {
        while badge.changed().await.is_ok() {
            let count = *badge.borrow_and_update();
            let message = HostMessage::UpdateBadge { count };
            match serde_json::to_string(&message) {
                Ok(line) => {
                    if badge_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Failed to encode badge update: {}", e),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                None
            }
        };
        let Some(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(reply) = dispatch(&session, &host, line).await {
            if out_tx.send(reply).is_err() {
                break;
            }
        }
    }

    session.shutdown().await;
    badge_task.abort();
    drop(out_tx);
    if let Err(e) = writer.await {
        warn!("Output task failed: {}", e);
    }
    Ok(())
}

async fn dispatch(session: &Session, host: &ConversionHost, line: &str) -> Option<String> {
    if let Ok(command) = serde_json::from_str::<PageCommand>(line) {
        return Some(run_page_command(session, command));
    }

    if let Ok(message) = serde_json::from_str::<HostMessage>(line) {
        debug!("Host message: {:?}", message);
        let response = host.handle(message).await?;
        return serde_json::to_string(&response).ok();
    }

    match session.handle_json(line).await {
        Ok(reply) => Some(reply),
        Err(e) => Some(json!({ "error": e.to_string() }).to_string()),
    }
}

fn run_page_command(session: &Session, command: PageCommand) -> String {
    match command {
        PageCommand::AppendParagraph { text } => {
            match session
                .document()
                .with(|doc| page::append_paragraph(doc, &text))
            {
                Ok(_) => json!({ "success": true }).to_string(),
                Err(e) => json!({ "error": e.to_string() }).to_string(),
            }
        }
        PageCommand::Render => {
            let paragraphs = session.document().read(page::paragraphs);
            json!({ "paragraphs": paragraphs }).to_string()
        }
    }
}
