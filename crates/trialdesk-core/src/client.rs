//! The backend contract: a [`RemoteService`] trait and its reqwest implementation.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::RemoteError;
use crate::folders::FolderListing;
use crate::record::ExtractionRecord;
use crate::summary::SummaryDraft;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Body of a successful `/extract-info` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    #[serde(default)]
    pub results: Vec<ExtractionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_processed: Option<usize>,
}

/// Body of a successful `/generate-summary` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: SummaryDraft,
}

/// Everything the front end asks of the backend. One request per call, no
/// retries, no caching.
pub trait RemoteService: Send + Sync {
    /// True iff the backend reports `status == "healthy"`. Never errors.
    fn health_check(&self) -> BoxFuture<'_, bool>;

    /// Folder listing for every category. Any failure yields
    /// [`FolderListing::empty`].
    fn get_all_folders(&self) -> BoxFuture<'_, FolderListing>;

    /// Sub-directories of a backend path. Any failure yields an empty list.
    fn get_subfolders<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Vec<String>>;

    /// Whether a backend path exists. Any failure yields `false`.
    fn path_exists<'a>(&'a self, path: &'a str) -> BoxFuture<'a, bool>;

    fn extract_key_info<'a>(
        &'a self,
        selected_items: &'a [String],
    ) -> BoxFuture<'a, Result<ExtractionResponse, RemoteError>>;

    fn generate_summary<'a>(
        &'a self,
        record: &'a ExtractionRecord,
    ) -> BoxFuture<'a, Result<SummaryResponse, RemoteError>>;

    /// Render the draft to a Word document and return its bytes.
    fn download_summary<'a>(
        &'a self,
        draft: &'a SummaryDraft,
    ) -> BoxFuture<'a, Result<Vec<u8>, RemoteError>>;
}

/// [`RemoteService`] over HTTP.
pub struct HttpService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpService {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let resp = self.client.get(&url).send().await?;
        decode_json(resp).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, RemoteError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let resp = self.client.post(&url).json(body).send().await?;
        decode_json(resp).await
    }
}

#[derive(Deserialize)]
struct HealthBody {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct SubfoldersBody {
    #[serde(default)]
    subfolders: Vec<String>,
}

#[derive(Deserialize)]
struct ExistsBody {
    #[serde(default)]
    exists: Option<bool>,
}

impl RemoteService for HttpService {
    fn health_check(&self) -> BoxFuture<'_, bool> {
        Box::pin(async move {
            match self.get_json::<HealthBody>("/health").await {
                Ok(body) => {
                    let healthy = body.status.as_deref() == Some("healthy");
                    tracing::info!(healthy, status = ?body.status, "health check");
                    healthy
                }
                Err(e) => {
                    tracing::warn!(error = %e, "health check failed");
                    false
                }
            }
        })
    }

    fn get_all_folders(&self) -> BoxFuture<'_, FolderListing> {
        Box::pin(async move {
            match self.get_json::<FolderListing>("/folders/all").await {
                Ok(listing) => {
                    tracing::info!(items = listing.total_items(), "fetched folder listing");
                    listing
                }
                Err(e) => {
                    tracing::warn!(error = %e, "folder listing failed, using empty listing");
                    FolderListing::empty()
                }
            }
        })
    }

    fn get_subfolders<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Vec<String>> {
        Box::pin(async move {
            match self.get_json::<SubfoldersBody>(&subfolders_path(path)).await {
                Ok(body) => body.subfolders,
                Err(e) => {
                    tracing::warn!(path, error = %e, "reading subfolders failed");
                    Vec::new()
                }
            }
        })
    }

    fn path_exists<'a>(&'a self, path: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            match self.get_json::<ExistsBody>(&check_path_path(path)).await {
                Ok(body) => body.exists.unwrap_or(false),
                Err(e) => {
                    tracing::warn!(path, error = %e, "path check failed");
                    false
                }
            }
        })
    }

    fn extract_key_info<'a>(
        &'a self,
        selected_items: &'a [String],
    ) -> BoxFuture<'a, Result<ExtractionResponse, RemoteError>> {
        Box::pin(async move {
            let body = extract_body(selected_items);
            let resp: ExtractionResponse = self.post_json("/extract-info", &body).await?;
            tracing::info!(
                requested = selected_items.len(),
                returned = resp.results.len(),
                "extraction finished"
            );
            Ok(resp)
        })
    }

    fn generate_summary<'a>(
        &'a self,
        record: &'a ExtractionRecord,
    ) -> BoxFuture<'a, Result<SummaryResponse, RemoteError>> {
        Box::pin(async move {
            let resp = self
                .post_json("/generate-summary", &summary_body(record))
                .await?;
            tracing::info!(literature = %record.literature_name, "summary generated");
            Ok(resp)
        })
    }

    fn download_summary<'a>(
        &'a self,
        draft: &'a SummaryDraft,
    ) -> BoxFuture<'a, Result<Vec<u8>, RemoteError>> {
        Box::pin(async move {
            let url = self.url("/download-summary");
            tracing::debug!(%url, "POST");
            let resp = self
                .client
                .post(&url)
                .json(&download_body(draft))
                .send()
                .await?;
            let bytes = decode_document(resp).await?;
            tracing::info!(bytes = bytes.len(), "summary document received");
            Ok(bytes)
        })
    }
}

fn subfolders_path(path: &str) -> String {
    format!("/folders?path={}", urlencoding::encode(path))
}

fn check_path_path(path: &str) -> String {
    format!("/check-path?path={}", urlencoding::encode(path))
}

fn extract_body(selected_items: &[String]) -> Value {
    json!({ "selected_items": selected_items })
}

fn summary_body(record: &ExtractionRecord) -> Value {
    json!({ "literature_info": record })
}

fn download_body(draft: &SummaryDraft) -> Value {
    json!({ "summary": draft })
}

/// The `error` field of a backend body, if it carries a truthy one.
fn backend_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Decode a JSON response: non-success status first, then a backend-reported
/// `error`, then the payload itself.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, RemoteError> {
    let status = resp.status();
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), url = %resp.url(), "backend returned error status");
        return Err(RemoteError::http_status(status.as_u16()));
    }
    let text = resp.text().await?;
    let body: Value = serde_json::from_str(&text)?;
    if let Some(msg) = backend_error(&body) {
        return Err(RemoteError::Failed(msg));
    }
    Ok(serde_json::from_value(body)?)
}

/// Decode a document download. A JSON-typed body carrying `error` is a
/// failure; any other successful body is the document.
pub(crate) async fn decode_document(resp: reqwest::Response) -> Result<Vec<u8>, RemoteError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(RemoteError::http_status(status.as_u16()));
    }
    let is_json = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    let bytes = resp.bytes().await?.to_vec();
    if is_json {
        let body: Value = serde_json::from_slice(&bytes)?;
        if let Some(msg) = backend_error(&body) {
            return Err(RemoteError::Failed(msg));
        }
        tracing::warn!("document response is JSON without an error field");
    }
    Ok(bytes)
}
