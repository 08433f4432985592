//! Page analysis: the [`Analyzer`] contract and its two implementations.
//!
//! * [`HttpAnalyzer`] POSTs `{ imageData, docType }` to the analysis endpoint
//!   (by default the mock in [`crate::server`]) and returns its `analysis`.
//! * [`LlmAnalyzer`] sends the page image straight to a vision LLM with a
//!   doc-type-specific prompt from [`crate::prompts`].
//!
//! Neither retries: a failed analysis is terminal for that invocation and the
//! user triggers a new one.

use crate::config::GalleryConfig;
use crate::doc_type::DocType;
use crate::error::GalleryError;
use crate::pipeline::{encode, postprocess};
use crate::prompts;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider, ProviderFactory};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Turns a page image into markdown for a given doc type.
pub trait Analyzer: Send + Sync {
    /// `image_data` is the page's PNG data URL.
    fn analyze<'a>(
        &'a self,
        image_data: &'a str,
        doc_type: DocType,
    ) -> BoxFuture<'a, Result<String, GalleryError>>;
}

// ── Wire format ──────────────────────────────────────────────────────────────

/// Request body of the analysis endpoint.
///
/// `doc_type` stays a plain string so the endpoint can answer unknown tags
/// with its fallback text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image_data: String,
    #[serde(default)]
    pub doc_type: String,
}

/// Success body of the analysis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

/// Failure body of the analysis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeErrorBody {
    pub error: String,
}

// ── HTTP ─────────────────────────────────────────────────────────────────────

/// [`Analyzer`] that calls the analysis endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAnalyzer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalyzer {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, GalleryError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| GalleryError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &GalleryConfig) -> Result<Self, GalleryError> {
        Self::new(
            config.endpoint_url.clone(),
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, image_data: &str, doc_type: DocType) -> Result<String, GalleryError> {
        let body = AnalyzeRequest {
            image_data: image_data.to_string(),
            doc_type: doc_type.tag().to_string(),
        };
        let start = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| GalleryError::AnalysisFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<AnalyzeErrorBody>()
                .await
                .map(|b| b.error)
                .unwrap_or_else(|_| "Failed to analyze image".to_string());
            warn!("Analysis endpoint answered {}: {}", status, detail);
            return Err(GalleryError::AnalysisRejected {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| GalleryError::AnalysisFailed(format!("malformed response: {e}")))?;

        debug!(
            "Analysis ({}) → {} chars in {:?}",
            doc_type,
            parsed.analysis.len(),
            start.elapsed()
        );
        Ok(parsed.analysis)
    }
}

impl Analyzer for HttpAnalyzer {
    fn analyze<'a>(
        &'a self,
        image_data: &'a str,
        doc_type: DocType,
    ) -> BoxFuture<'a, Result<String, GalleryError>> {
        Box::pin(self.post(image_data, doc_type))
    }
}

// ── Vision LLM ───────────────────────────────────────────────────────────────

/// [`Analyzer`] that asks a vision LLM directly.
pub struct LlmAnalyzer {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    max_tokens: usize,
}

impl LlmAnalyzer {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider,
            temperature: 0.1,
            max_tokens: 4096,
        }
    }

    /// Resolve a provider by name (or auto-detect from API-key env vars).
    pub fn from_env(provider_name: Option<&str>, model: Option<&str>) -> Result<Self, GalleryError> {
        let provider = match provider_name {
            Some(name) => {
                let model = model.unwrap_or("gpt-4.1-nano");
                ProviderFactory::create_llm_provider(name, model).map_err(|e| {
                    GalleryError::ProviderNotConfigured {
                        provider: name.to_string(),
                        hint: format!("{e}"),
                    }
                })?
            }
            None => {
                let (llm, _embedding) =
                    ProviderFactory::from_env().map_err(|e| GalleryError::ProviderNotConfigured {
                        provider: "auto".to_string(),
                        hint: format!(
                            "Set OPENAI_API_KEY, ANTHROPIC_API_KEY or GEMINI_API_KEY.\nError: {e}"
                        ),
                    })?;
                llm
            }
        };
        Ok(Self::new(provider))
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.max_tokens = n;
        self
    }

    fn build_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        }
    }

    async fn ask(&self, image_data: &str, doc_type: DocType) -> Result<String, GalleryError> {
        let (mime, b64) = encode::split_data_url(image_data)?;
        let image = ImageData::new(b64.to_string(), mime).with_detail("high");

        let messages = vec![
            ChatMessage::system(prompts::system_prompt(doc_type)),
            ChatMessage::user_with_images("", vec![image]),
        ];

        let start = Instant::now();
        let response = self
            .provider
            .chat(&messages, Some(&self.build_options()))
            .await
            .map_err(|e| GalleryError::AnalysisFailed(e.to_string()))?;

        info!(
            "LLM analysis ({}): {} in / {} out tokens, {:?}",
            doc_type,
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );
        Ok(postprocess::clean_markdown(&response.content))
    }
}

impl Analyzer for LlmAnalyzer {
    fn analyze<'a>(
        &'a self,
        image_data: &'a str,
        doc_type: DocType,
    ) -> BoxFuture<'a, Result<String, GalleryError>> {
        Box::pin(self.ask(image_data, doc_type))
    }
}
