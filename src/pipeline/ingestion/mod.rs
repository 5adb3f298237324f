pub mod pdf;

pub use pdf::*;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Cannot read report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Report contains no extractable text")]
    NoText,
}

/// Turns a document's bytes into report text.
pub trait ReportIngestor {
    fn ingest(&self, bytes: &[u8]) -> Result<String, IngestionError>;
}

/// Plain-text reports. Invalid UTF-8 is replaced, not rejected.
pub struct PlainTextIngestor;

impl ReportIngestor for PlainTextIngestor {
    fn ingest(&self, bytes: &[u8]) -> Result<String, IngestionError> {
        let text = String::from_utf8_lossy(bytes).into_owned();
        if text.trim().is_empty() {
            return Err(IngestionError::NoText);
        }
        Ok(text)
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Read a report from disk, choosing the ingestor by file extension.
pub fn ingest_path(path: &Path) -> Result<String, IngestionError> {
    let bytes = std::fs::read(path).map_err(|source| IngestionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let text = if is_pdf(path) {
        PdfIngestor.ingest(&bytes)?
    } else {
        PlainTextIngestor.ingest(&bytes)?
    };

    info!(
        path = %path.display(),
        chars = text.chars().count(),
        "Report ingested"
    );
    Ok(text)
}
