//! Writing the generated summary document to disk.

use std::io;
use std::path::{Path, PathBuf};

/// File name of every downloaded summary. An existing file is replaced.
pub const DOCUMENT_FILENAME: &str = "方案摘要.docx";

/// Platform download directory, falling back to the working directory.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Write `bytes` to `<dir>/方案摘要.docx`, creating `dir` if needed. The
/// buffer is consumed and dropped once written.
pub fn save_document(dir: &Path, bytes: Vec<u8>) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(DOCUMENT_FILENAME);
    std::fs::write(&path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "saved summary document");
    Ok(path)
}
