use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::{verification_prompt, NameVerifier, Pricing};
use crate::config::{
    ConfigError, LeiscopeConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
    DEFAULT_GEMINI_TIMEOUT_MS,
};
use crate::error::SourceErrorKind;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::retry::{RetryPolicy, MAX_SERVER_DELAY};
use crate::{SourceCitation, SourceError, ValidationError, VerificationResult};

pub const GEMINI_SOURCE_ID: &str = "gemini";

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_ERROR_BODY_CHARS: usize = 300;

static RETRY_DELAY_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']retryDelay["']\s*:\s*["'](\d+(?:\.\d+)?)s?["']"#)
        .expect("retry delay pattern is valid")
});

/// Gemini `generateContent` verifier with Google Search grounding.
#[derive(Clone)]
pub struct GeminiVerifier {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    model: String,
    base_url: String,
    timeout_ms: u64,
    pricing: Pricing,
    retry: RetryPolicy,
}

impl GeminiVerifier {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            auth: HttpAuth::header(API_KEY_HEADER, api_key),
            model: String::from(DEFAULT_GEMINI_MODEL),
            base_url: String::from(DEFAULT_GEMINI_BASE_URL),
            timeout_ms: DEFAULT_GEMINI_TIMEOUT_MS,
            pricing: Pricing::default(),
            retry: RetryPolicy::default(),
        }
    }

    /// Fails when no API key is configured.
    pub fn from_config(config: &LeiscopeConfig) -> Result<Self, ConfigError> {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(
        http_client: Arc<dyn HttpClient>,
        config: &LeiscopeConfig,
    ) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key()?;

        Ok(Self::new(http_client, api_key)
            .with_model(&config.gemini_model)
            .with_base_url(&config.gemini_base_url)
            .with_timeout_ms(config.gemini_timeout_ms))
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_owned();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Runs the request up to `retry.attempts()` times.
    async fn generate(&self, body: &str) -> Result<GenerateContentResponse, SourceError> {
        let attempts = self.retry.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match self.generate_once(body).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            if !error.retryable() {
                return Err(error);
            }
            if attempt >= attempts {
                return Err(exhausted(error, attempts));
            }

            let delay = self
                .retry
                .delay_for_attempt(attempt - 1, error.retry_after());
            warn!(
                attempt,
                max_attempts = attempts,
                delay_secs = delay.as_secs_f64(),
                error = %error,
                "gemini attempt failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn generate_once(&self, body: &str) -> Result<GenerateContentResponse, SourceError> {
        let request = HttpRequest::post(self.endpoint())
            .with_auth(&self.auth)
            .with_json_body(body)
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            if error.retryable() {
                SourceError::unavailable(format!("gemini transport error: {}", error.message()))
            } else {
                SourceError::internal(format!("gemini transport error: {}", error.message()))
            }
        })?;

        if !response.is_success() {
            return Err(self.status_error(&response));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| SourceError::internal(format!("failed to parse gemini response: {}", e)))
    }

    fn status_error(&self, response: &HttpResponse) -> SourceError {
        let envelope = serde_json::from_str::<GeminiErrorEnvelope>(&response.body).ok();
        let detail = envelope
            .as_ref()
            .and_then(|envelope| envelope.error.as_ref())
            .and_then(|error| error.message.clone())
            .unwrap_or_else(|| truncate(&response.body, MAX_ERROR_BODY_CHARS));
        let message = format!(
            "gemini upstream returned status {}: {}",
            response.status, detail
        );

        let error = match response.status {
            429 => SourceError::rate_limited(message),
            status if self.retry.should_retry_status(status) => SourceError::unavailable(message),
            _ => return SourceError::internal(message),
        };

        let hint = envelope
            .as_ref()
            .and_then(GeminiErrorEnvelope::retry_delay)
            .or_else(|| retry_delay_hint(&response.body))
            .or(response.retry_after);

        match hint {
            Some(delay) => error.with_retry_after(delay),
            None => error,
        }
    }
}

impl NameVerifier for GeminiVerifier {
    fn id(&self) -> &'static str {
        GEMINI_SOURCE_ID
    }

    fn verify_legal_name<'a>(
        &'a self,
        website: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<VerificationResult, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let website = website.trim();
            if website.is_empty() {
                return Err(SourceError::from(ValidationError::EmptyWebsite));
            }

            let body = json!({
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": verification_prompt(website) }]
                }],
                "tools": [{ "google_search": {} }],
                "generationConfig": { "responseModalities": ["TEXT"] }
            })
            .to_string();

            debug!(website, model = %self.model, "requesting legal name verification");
            let response = self.generate(&body).await?;

            let (input_tokens, output_tokens) = response.token_counts();
            let estimated_cost = self.pricing.cost(input_tokens, output_tokens);
            let result =
                VerificationResult::new(response.text(), response.citations(), estimated_cost)
                    .map_err(|e| SourceError::internal(e.to_string()))?;

            info!(
                website,
                verified = result.legal_name.is_some(),
                sources = result.sources.len(),
                input_tokens,
                output_tokens,
                estimated_cost,
                "gemini verification complete"
            );
            Ok(result)
        })
    }
}

fn exhausted(last: SourceError, attempts: u32) -> SourceError {
    let message = format!("gemini request failed after {attempts} attempts: {last}");
    let error = match last.kind() {
        SourceErrorKind::RateLimited => SourceError::rate_limited(message),
        SourceErrorKind::Unavailable => SourceError::unavailable(message),
        SourceErrorKind::InvalidRequest => SourceError::invalid_request(message),
        SourceErrorKind::Internal => SourceError::internal(message),
    };

    match last.retry_after() {
        Some(delay) => error.with_retry_after(delay),
        None => error,
    }
}

/// Finds a `retryDelay` hint (e.g. `"37s"`) anywhere in an error payload.
fn retry_delay_hint(text: &str) -> Option<Duration> {
    let captures = RETRY_DELAY_HINT.captures(text)?;
    parse_seconds(captures.get(1)?.as_str())
}

/// Values beyond [`MAX_SERVER_DELAY`], including ones too large for a
/// `Duration`, are clamped to it.
fn parse_seconds(value: &str) -> Option<Duration> {
    let seconds = value.trim().trim_end_matches('s').parse::<f64>().ok()?;
    if seconds.is_nan() || seconds < 0.0 {
        return None;
    }

    let delay = Duration::try_from_secs_f64(seconds).unwrap_or(MAX_SERVER_DELAY);
    Some(delay.min(MAX_SERVER_DELAY))
}

fn truncate(body: &str, max_chars: usize) -> String {
    let body = body.trim();
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_owned(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u64>,
    #[serde(default)]
    candidates_token_count: Option<u64>,
}

impl GenerateContentResponse {
    fn candidates(&self) -> &[Candidate] {
        self.candidates.as_deref().unwrap_or_default()
    }

    /// Text parts of the first candidate, concatenated.
    fn text(&self) -> Option<String> {
        let parts = self.candidates().first()?.content.as_ref()?.parts.as_ref()?;
        let text: String = parts.iter().filter_map(|part| part.text.as_deref()).collect();
        Some(text)
    }

    fn citations(&self) -> Vec<SourceCitation> {
        self.candidates()
            .iter()
            .filter_map(|candidate| candidate.grounding_metadata.as_ref())
            .filter_map(|metadata| metadata.grounding_chunks.as_ref())
            .flatten()
            .filter_map(|chunk| chunk.web.as_ref())
            .map(|web| {
                SourceCitation::new(
                    web.uri.clone().unwrap_or_default(),
                    web.title.clone().unwrap_or_default(),
                )
            })
            .collect()
    }

    fn token_counts(&self) -> (u64, u64) {
        self.usage_metadata
            .as_ref()
            .map(|usage| {
                (
                    usage.prompt_token_count.unwrap_or_default(),
                    usage.candidates_token_count.unwrap_or_default(),
                )
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    #[serde(default)]
    error: Option<GeminiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<Vec<Value>>,
}

impl GeminiErrorEnvelope {
    /// `retryDelay` from a `google.rpc.RetryInfo` detail.
    fn retry_delay(&self) -> Option<Duration> {
        self.error
            .as_ref()?
            .details
            .as_ref()?
            .iter()
            .filter(|detail| {
                detail
                    .get("@type")
                    .and_then(Value::as_str)
                    .is_some_and(|kind| kind.ends_with("RetryInfo"))
            })
            .find_map(|detail| detail.get("retryDelay").and_then(Value::as_str))
            .and_then(parse_seconds)
    }
}
