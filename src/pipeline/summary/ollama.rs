use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{build_summary_prompt, transport_error, Summarizer, SummaryError};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

const SYSTEM_PROMPT: &str = "You summarize medical reports for the patient who owns them.";

/// Ollama HTTP client for local summaries.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, SummaryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SummaryError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl Summarizer for OllamaClient {
    fn summarize(&self, report_text: &str, model: &str) -> Result<String, SummaryError> {
        let url = format!("{}/api/generate", self.base_url);
        let prompt = build_summary_prompt(report_text);
        let body = OllamaGenerateRequest {
            model,
            prompt: &prompt,
            system: SYSTEM_PROMPT,
            stream: false,
        };

        debug!(model, "Requesting Ollama summary");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| transport_error(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SummaryError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| SummaryError::ResponseParsing(e.to_string()))?;

        if parsed.response.trim().is_empty() {
            return Err(SummaryError::EmptyResponse);
        }
        Ok(parsed.response)
    }
}
