use std::path::PathBuf;

use trialdesk_core::{
    ExtractionRecord, ExtractionResponse, FolderListing, RemoteError, SummaryDraft,
    SummaryResponse,
};

/// Commands sent from the TUI to the backend task.
///
/// Every command carries the generation the app issued it under; the matching
/// [`BackendEvent`] echoes it back so stale responses can be dropped.
#[derive(Debug, Clone)]
pub enum BackendCommand {
    /// Health check, then the folder listing if the backend is healthy.
    Load { generation: u64 },
    /// Extract key information for composite `"<category>/<item>"` keys.
    Extract { generation: u64, keys: Vec<String> },
    GenerateSummary {
        generation: u64,
        record: ExtractionRecord,
    },
    /// Render the draft and write the document into `dir`.
    Download {
        generation: u64,
        draft: SummaryDraft,
        dir: PathBuf,
    },
}

/// Events flowing from the backend task to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    Loaded {
        generation: u64,
        healthy: bool,
        listing: FolderListing,
    },
    Extracted {
        generation: u64,
        result: Result<ExtractionResponse, RemoteError>,
    },
    SummaryGenerated {
        generation: u64,
        result: Result<SummaryResponse, RemoteError>,
    },
    /// `Ok` holds the path the document was written to.
    Downloaded {
        generation: u64,
        result: Result<PathBuf, String>,
    },
}
