use thiserror::Error;

pub mod category;
pub mod client;
pub mod config_file;
pub mod download;
pub mod folders;
pub mod mock;
pub mod record;
pub mod results;
pub mod summary;

// Re-export for convenience
pub use category::{Category, DEFAULT_DATA_ROOT};
pub use client::{
    BoxFuture, DEFAULT_API_URL, ExtractionResponse, HttpService, RemoteService, SummaryResponse,
};
pub use config_file::{ConfigFile, Overrides, Settings};
pub use download::{DOCUMENT_FILENAME, save_document};
pub use folders::{FolderListing, SelectionSet};
pub use mock::MockService;
pub use record::{ExtractionRecord, RecordKey};
pub use results::{FieldSpec, GroupedResults, NOT_MENTIONED, ResultRow, ResultTable};
pub use summary::{
    FORM, FieldPath, FormField, FormRow, Group, NestedField, ScalarField, SummaryDraft,
};

/// The single failure kind for backend calls.
///
/// Timeouts, 4xx/5xx statuses, backend-reported `error` fields and malformed
/// payloads all collapse into one human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("remote call failed: {0}")]
    Failed(String),
}

impl RemoteError {
    /// Error for a non-success HTTP status.
    pub fn http_status(status: u16) -> Self {
        RemoteError::Failed(format!("HTTP error! status: {status}"))
    }

    /// The bare message, without the "remote call failed" prefix.
    pub fn message(&self) -> &str {
        match self {
            RemoteError::Failed(msg) => msg,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        RemoteError::Failed(e.to_string())
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(e: serde_json::Error) -> Self {
        RemoteError::Failed(format!("malformed response: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_message() {
        let err = RemoteError::http_status(503);
        assert_eq!(err.message(), "HTTP error! status: 503");
        assert_eq!(err.to_string(), "remote call failed: HTTP error! status: 503");
    }
}
