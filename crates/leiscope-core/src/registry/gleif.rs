use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{EntityRegistry, RegistrySearch};
use crate::config::{
    LeiscopeConfig, DEFAULT_GLEIF_BASE_URL, DEFAULT_GLEIF_TIMEOUT_MS, DEFAULT_PAGE_SIZE,
};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::throttling::RequestThrottle;
use crate::{format_address, EntityRecord, Lei, SourceError};

pub const GLEIF_SOURCE_ID: &str = "gleif";

/// Published GLEIF API quota per client.
pub const GLEIF_REQUESTS_PER_MINUTE: u32 = 60;

const JSON_API_ACCEPT: &str = "application/vnd.api+json";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const MAX_ERROR_BODY_CHARS: usize = 300;

/// GLEIF LEI-records adapter.
///
/// Never retries: transport and status errors surface immediately.
#[derive(Clone)]
pub struct GleifRegistry {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
    page_size: usize,
    throttle: RequestThrottle,
}

impl GleifRegistry {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_GLEIF_BASE_URL),
            timeout_ms: DEFAULT_GLEIF_TIMEOUT_MS,
            page_size: DEFAULT_PAGE_SIZE,
            throttle: RequestThrottle::per_minute(GLEIF_REQUESTS_PER_MINUTE),
        }
    }

    pub fn from_config(config: &LeiscopeConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &LeiscopeConfig) -> Self {
        Self::new(http_client)
            .with_base_url(&config.gleif_base_url)
            .with_timeout_ms(config.gleif_timeout_ms)
            .with_page_size(config.page_size)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_throttle(mut self, throttle: RequestThrottle) -> Self {
        self.throttle = throttle;
        self
    }

    fn search_url(&self, request: &RegistrySearch) -> String {
        let mut url = format!(
            "{}/lei-records?filter[entity.legalName]={}&page[size]={}&page[number]=1",
            self.base_url,
            urlencoding::encode(&request.name),
            request.page_size,
        );

        if let Some(country) = &request.country {
            url.push_str("&filter[entity.legalAddress.country]=");
            url.push_str(&urlencoding::encode(country));
        }
        if let Some(status) = &request.status {
            url.push_str("&filter[entity.status]=");
            url.push_str(&urlencoding::encode(status));
        }

        url
    }

    fn record_url(&self, lei: &Lei) -> String {
        format!("{}/lei-records/{}", self.base_url, lei.as_str())
    }

    async fn get(&self, url: String) -> Result<HttpResponse, SourceError> {
        self.throttle.acquire().await;

        let request = HttpRequest::get(url)
            .with_header("accept", JSON_API_ACCEPT)
            .with_header("user-agent", BROWSER_USER_AGENT)
            .with_timeout_ms(self.timeout_ms);

        self.http_client.execute(request).await.map_err(|error| {
            if error.retryable() {
                SourceError::unavailable(format!("gleif transport error: {}", error.message()))
            } else {
                SourceError::internal(format!("gleif transport error: {}", error.message()))
            }
        })
    }
}

impl EntityRegistry for GleifRegistry {
    fn id(&self) -> &'static str {
        GLEIF_SOURCE_ID
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn search<'a>(
        &'a self,
        request: RegistrySearch,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EntityRecord>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            debug!(
                name = %request.name,
                page_size = request.page_size,
                country = ?request.country,
                status = ?request.status,
                "searching gleif by legal name"
            );

            let response = self.get(self.search_url(&request)).await?;
            if !response.is_success() {
                return Err(status_error(&response));
            }

            let records = parse_lei_records(&response.body)?;
            info!(name = %request.name, count = records.len(), "gleif search complete");
            Ok(records)
        })
    }

    fn lookup<'a>(
        &'a self,
        lei: &'a Lei,
    ) -> Pin<Box<dyn Future<Output = Result<Option<EntityRecord>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            debug!(lei = %lei, "looking up gleif record");

            let response = self.get(self.record_url(lei)).await?;
            if response.status == 404 {
                info!(lei = %lei, "lei not found");
                return Ok(None);
            }
            if !response.is_success() {
                return Err(status_error(&response));
            }

            Ok(parse_lei_records(&response.body)?.into_iter().next())
        })
    }
}

fn status_error(response: &HttpResponse) -> SourceError {
    let message = format!(
        "gleif upstream returned status {}: {}",
        response.status,
        truncate(&response.body, MAX_ERROR_BODY_CHARS)
    );

    match response.status {
        429 => {
            let error = SourceError::rate_limited(message);
            match response.retry_after {
                Some(delay) => error.with_retry_after(delay),
                None => error,
            }
        }
        408 | 500..=599 => SourceError::unavailable(message),
        _ => SourceError::internal(message),
    }
}

fn truncate(body: &str, max_chars: usize) -> String {
    let body = body.trim();
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_owned(),
    }
}

/// Parses a JSON:API document whose `data` is either one record or a list.
///
/// Records that do not have the expected shape are skipped with a warning;
/// only an unparseable document is an error.
fn parse_lei_records(body: &str) -> Result<Vec<EntityRecord>, SourceError> {
    let document: GleifDocument = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse gleif response: {}", e)))?;

    let raw_records = match document.data {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    };

    let records = raw_records
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, raw)| match serde_json::from_value::<GleifRecord>(raw) {
                Ok(record) => Some(record.into_entity_record()),
                Err(error) => {
                    warn!(index, %error, "skipping malformed gleif record");
                    None
                }
            },
        )
        .collect();

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct GleifDocument {
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct GleifRecord {
    #[serde(default)]
    id: Option<String>,
    attributes: GleifAttributes,
}

#[derive(Debug, Deserialize)]
struct GleifAttributes {
    #[serde(default)]
    lei: Option<String>,
    #[serde(default)]
    entity: Option<GleifEntity>,
    #[serde(default)]
    registration: Option<GleifRegistration>,
}

#[derive(Debug, Default, Deserialize)]
struct GleifEntity {
    #[serde(rename = "legalName", default)]
    legal_name: Option<GleifName>,
    #[serde(rename = "legalAddress", default)]
    legal_address: Option<GleifAddress>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    jurisdiction: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GleifName {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GleifAddress {
    #[serde(rename = "addressLines", default)]
    address_lines: Option<Vec<Option<String>>>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(rename = "postalCode", default)]
    postal_code: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GleifRegistration {
    #[serde(rename = "initialRegistrationDate", default)]
    initial_registration_date: Option<String>,
    #[serde(rename = "lastUpdateDate", default)]
    last_update_date: Option<String>,
}

impl GleifRecord {
    fn into_entity_record(self) -> EntityRecord {
        let GleifAttributes {
            lei,
            entity,
            registration,
        } = self.attributes;
        let entity = entity.unwrap_or_default();
        let registration = registration.unwrap_or_default();
        let address = entity.legal_address.unwrap_or_default();

        let lines = address.address_lines.unwrap_or_default();
        let formatted = format_address(
            lines.iter().flatten().map(String::as_str),
            address.city.as_deref().unwrap_or_default(),
            address.region.as_deref().unwrap_or_default(),
            address.postal_code.as_deref().unwrap_or_default(),
            address.country.as_deref().unwrap_or_default(),
        );

        let id = lei
            .filter(|lei| !lei.is_empty())
            .or(self.id)
            .unwrap_or_default();

        EntityRecord {
            id,
            legal_name: entity
                .legal_name
                .and_then(|name| name.name)
                .unwrap_or_default(),
            status: entity.status.unwrap_or_default(),
            country: address.country.unwrap_or_default(),
            city: address.city.unwrap_or_default(),
            postal_code: address.postal_code.unwrap_or_default(),
            jurisdiction: entity.jurisdiction.unwrap_or_default(),
            category: entity.category.unwrap_or_default(),
            address: formatted,
            registration_date: registration.initial_registration_date.unwrap_or_default(),
            last_update: registration.last_update_date.unwrap_or_default(),
        }
    }
}
