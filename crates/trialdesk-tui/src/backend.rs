use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use trialdesk_core::{FolderListing, RemoteService, save_document};

use crate::tui_event::{BackendCommand, BackendEvent};

/// Receive commands until the channel closes or `cancel` fires. Each command
/// runs as its own task so a slow extraction never blocks a reload.
pub async fn run(
    service: Arc<dyn RemoteService>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    loop {
        let cmd = tokio::select! {
            _ = cancel.cancelled() => break,
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };

        let service = Arc::clone(&service);
        let tx = event_tx.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                event = execute(service.as_ref(), cmd) => {
                    // The UI may already be gone on shutdown.
                    let _ = tx.send(event);
                }
            }
        });
    }
    tracing::debug!("backend task stopped");
}

/// Run one command against the service and build the event reporting it.
pub async fn execute(service: &dyn RemoteService, cmd: BackendCommand) -> BackendEvent {
    match cmd {
        BackendCommand::Load { generation } => {
            let healthy = service.health_check().await;
            let listing = if healthy {
                service.get_all_folders().await
            } else {
                FolderListing::empty()
            };
            BackendEvent::Loaded {
                generation,
                healthy,
                listing,
            }
        }
        BackendCommand::Extract { generation, keys } => {
            tracing::info!(generation, items = keys.len(), "extracting key information");
            BackendEvent::Extracted {
                generation,
                result: service.extract_key_info(&keys).await,
            }
        }
        BackendCommand::GenerateSummary { generation, record } => {
            tracing::info!(generation, literature = %record.literature_name, "generating summary");
            BackendEvent::SummaryGenerated {
                generation,
                result: service.generate_summary(&record).await,
            }
        }
        BackendCommand::Download {
            generation,
            draft,
            dir,
        } => {
            let result = match service.download_summary(&draft).await {
                Ok(bytes) => tokio::task::spawn_blocking(move || save_document(&dir, bytes))
                    .await
                    .map_err(|e| e.to_string())
                    .and_then(|saved| saved.map_err(|e| e.to_string())),
                Err(e) => Err(e.message().to_string()),
            };
            BackendEvent::Downloaded { generation, result }
        }
    }
}
