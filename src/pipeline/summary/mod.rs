//! Free-text report summaries from a generative-language service.
//!
//! The service is a black box: report text in, summary text out. Failures
//! are reported on their own and never touch extraction or prediction.

pub mod gemini;
pub mod ollama;

pub use gemini::*;
pub use ollama::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Summarizer is not reachable at {0}")]
    Connection(String),

    #[error("Summarizer request timed out after {0}s")]
    Timeout(u64),

    #[error("Summarizer returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Summarizer returned an empty response")]
    EmptyResponse,

    #[error("No API key configured for the summarizer")]
    MissingApiKey,
}

/// Text-in, text-out summary service. Blocks until the full response arrives.
pub trait Summarizer {
    fn summarize(&self, report_text: &str, model: &str) -> Result<String, SummaryError>;
}

/// Build the summary prompt for a report.
pub fn build_summary_prompt(report_text: &str) -> String {
    format!(
        "You are a digital medical assistant.\n\n\
Based on the following report, summarize the key findings.\n\
Also highlight any signs of diabetes or breast cancer if present.\n\n\
{report_text}\n"
    )
}

/// Map a reqwest transport error onto the summary taxonomy.
pub(crate) fn transport_error(e: reqwest::Error, base_url: &str, timeout_secs: u64) -> SummaryError {
    if e.is_connect() {
        SummaryError::Connection(base_url.to_string())
    } else if e.is_timeout() {
        SummaryError::Timeout(timeout_secs)
    } else {
        SummaryError::HttpClient(e.to_string())
    }
}

/// Summarizer returning a fixed response or a fixed failure.
pub struct MockSummarizer {
    response: Result<String, String>,
    delay: Option<std::time::Duration>,
}

impl MockSummarizer {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            delay: None,
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            response: Err(error.to_string()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl Summarizer for MockSummarizer {
    fn summarize(&self, _report_text: &str, _model: &str) -> Result<String, SummaryError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.response.clone().map_err(SummaryError::HttpClient)
    }
}
