//! Entity registry contract and search request types.
//!
//! A registry answers two questions: which entities have a legal name like
//! this one ([`EntityRegistry::search`]), and what does the record for this
//! identifier say ([`EntityRegistry::lookup`]).
//!
//! Implementations must:
//!
//! - return `Ok(vec![])` for "no candidates", never an error;
//! - keep the registry's own relevance order, without extra filtering;
//! - reject invalid input before sending anything.

mod gleif;

use std::future::Future;
use std::pin::Pin;

pub use gleif::{GleifRegistry, GLEIF_REQUESTS_PER_MINUTE, GLEIF_SOURCE_ID};

use crate::config::DEFAULT_PAGE_SIZE;
use crate::{EntityRecord, Lei, SourceError, ValidationError};

/// Largest page the GLEIF API serves.
pub const MAX_PAGE_SIZE: usize = 200;

/// Status filter applied unless the caller asks for every status.
pub const DEFAULT_STATUS_FILTER: &str = "ACTIVE";

/// Name search against a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySearch {
    /// Trimmed, non-empty legal-name query.
    pub name: String,
    /// Between 1 and [`MAX_PAGE_SIZE`].
    pub page_size: usize,
    /// Uppercase ISO 3166-1 alpha-2 code.
    pub country: Option<String>,
    /// Uppercase entity status; `None` means all statuses.
    pub status: Option<String>,
}

impl RegistrySearch {
    /// Active entities only, first page of [`DEFAULT_PAGE_SIZE`] records.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ValidationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCompanyName);
        }

        Ok(Self {
            name: name.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            country: None,
            status: Some(String::from(DEFAULT_STATUS_FILTER)),
        })
    }

    /// Clamps into `1..=MAX_PAGE_SIZE`.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_country(mut self, country: &str) -> Result<Self, ValidationError> {
        let country = country.trim();
        if country.len() != 2 || !country.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCountry {
                value: country.to_owned(),
            });
        }

        self.country = Some(country.to_ascii_uppercase());
        Ok(self)
    }

    pub fn with_status(mut self, status: &str) -> Self {
        let status = status.trim();
        self.status = (!status.is_empty()).then(|| status.to_ascii_uppercase());
        self
    }

    pub fn all_statuses(mut self) -> Self {
        self.status = None;
        self
    }
}

/// Registry adapter contract.
///
/// Implementations are shared across concurrent lookups, so they must be
/// `Send + Sync` and keep any connection state behind `Arc`s.
pub trait EntityRegistry: Send + Sync {
    /// Short identifier used in logs, e.g. `"gleif"`.
    fn id(&self) -> &'static str;

    /// Page size used by [`search_by_name`](EntityRegistry::search_by_name).
    fn page_size(&self) -> usize {
        DEFAULT_PAGE_SIZE
    }

    /// Name search returning candidates in registry relevance order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the transport fails or the registry
    /// answers with an error status. Zero matches is `Ok(vec![])`.
    fn search<'a>(
        &'a self,
        request: RegistrySearch,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EntityRecord>, SourceError>> + Send + 'a>>;

    /// Direct lookup by identifier; `Ok(None)` when the registry has no such record.
    fn lookup<'a>(
        &'a self,
        lei: &'a Lei,
    ) -> Pin<Box<dyn Future<Output = Result<Option<EntityRecord>, SourceError>> + Send + 'a>>;

    /// Default search: active entities, [`page_size`](EntityRegistry::page_size) records.
    ///
    /// A blank name fails with an `InvalidRequest` error before any request.
    fn search_by_name<'a>(
        &'a self,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EntityRecord>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let request = RegistrySearch::new(name)?.with_page_size(self.page_size());
            self.search(request).await
        })
    }
}
