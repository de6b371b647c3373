//! Mock backend for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::RemoteError;
use crate::client::{BoxFuture, ExtractionResponse, RemoteService, SummaryResponse};
use crate::folders::FolderListing;
use crate::record::ExtractionRecord;
use crate::summary::SummaryDraft;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A hand-rolled mock implementing [`RemoteService`].
///
/// Every operation returns a fixed, configurable response. Calls are counted
/// and the arguments of the mutating operations are recorded so tests can
/// assert on what would have been sent.
pub struct MockService {
    healthy: bool,
    listing: FolderListing,
    subfolders: Vec<String>,
    exists: bool,
    extraction: Result<ExtractionResponse, RemoteError>,
    summary: Result<SummaryResponse, RemoteError>,
    document: Result<Vec<u8>, RemoteError>,
    extract_calls: Mutex<Vec<Vec<String>>>,
    summary_calls: Mutex<Vec<ExtractionRecord>>,
    download_calls: Mutex<Vec<SummaryDraft>>,
    health_count: AtomicUsize,
    folders_count: AtomicUsize,
}

impl Default for MockService {
    fn default() -> Self {
        Self {
            healthy: true,
            listing: FolderListing::empty(),
            subfolders: Vec::new(),
            exists: true,
            extraction: Ok(ExtractionResponse::default()),
            summary: Ok(SummaryResponse::default()),
            document: Ok(Vec::new()),
            extract_calls: Mutex::new(Vec::new()),
            summary_calls: Mutex::new(Vec::new()),
            download_calls: Mutex::new(Vec::new()),
            health_count: AtomicUsize::new(0),
            folders_count: AtomicUsize::new(0),
        }
    }
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    pub fn with_listing(mut self, listing: FolderListing) -> Self {
        self.listing = listing;
        self
    }

    pub fn with_subfolders(mut self, subfolders: Vec<String>) -> Self {
        self.subfolders = subfolders;
        self
    }

    pub fn with_path_exists(mut self, exists: bool) -> Self {
        self.exists = exists;
        self
    }

    pub fn with_extraction(mut self, result: Result<ExtractionResponse, RemoteError>) -> Self {
        self.extraction = result;
        self
    }

    pub fn with_summary(mut self, result: Result<SummaryResponse, RemoteError>) -> Self {
        self.summary = result;
        self
    }

    pub fn with_document(mut self, result: Result<Vec<u8>, RemoteError>) -> Self {
        self.document = result;
        self
    }

    pub fn health_count(&self) -> usize {
        self.health_count.load(Ordering::SeqCst)
    }

    pub fn folders_count(&self) -> usize {
        self.folders_count.load(Ordering::SeqCst)
    }

    /// Key lists passed to `extract_key_info`, one entry per call.
    pub fn extract_calls(&self) -> Vec<Vec<String>> {
        lock(&self.extract_calls).clone()
    }

    pub fn summary_calls(&self) -> Vec<ExtractionRecord> {
        lock(&self.summary_calls).clone()
    }

    pub fn download_calls(&self) -> Vec<SummaryDraft> {
        lock(&self.download_calls).clone()
    }
}

impl RemoteService for MockService {
    fn health_check(&self) -> BoxFuture<'_, bool> {
        self.health_count.fetch_add(1, Ordering::SeqCst);
        let healthy = self.healthy;
        Box::pin(async move { healthy })
    }

    fn get_all_folders(&self) -> BoxFuture<'_, FolderListing> {
        self.folders_count.fetch_add(1, Ordering::SeqCst);
        let listing = self.listing.clone();
        Box::pin(async move { listing })
    }

    fn get_subfolders<'a>(&'a self, _path: &'a str) -> BoxFuture<'a, Vec<String>> {
        let subfolders = self.subfolders.clone();
        Box::pin(async move { subfolders })
    }

    fn path_exists<'a>(&'a self, _path: &'a str) -> BoxFuture<'a, bool> {
        let exists = self.exists;
        Box::pin(async move { exists })
    }

    fn extract_key_info<'a>(
        &'a self,
        selected_items: &'a [String],
    ) -> BoxFuture<'a, Result<ExtractionResponse, RemoteError>> {
        lock(&self.extract_calls).push(selected_items.to_vec());
        let result = self.extraction.clone();
        Box::pin(async move { result })
    }

    fn generate_summary<'a>(
        &'a self,
        record: &'a ExtractionRecord,
    ) -> BoxFuture<'a, Result<SummaryResponse, RemoteError>> {
        lock(&self.summary_calls).push(record.clone());
        let result = self.summary.clone();
        Box::pin(async move { result })
    }

    fn download_summary<'a>(
        &'a self,
        draft: &'a SummaryDraft,
    ) -> BoxFuture<'a, Result<Vec<u8>, RemoteError>> {
        lock(&self.download_calls).push(draft.clone());
        let result = self.document.clone();
        Box::pin(async move { result })
    }
}
