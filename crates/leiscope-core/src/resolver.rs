//! LEI reconciliation.
//!
//! [`LeiResolver::find_lei`] runs the registry search first and only asks
//! the verifier when there is at least one candidate, so an unknown company
//! never costs a verifier call. The two names are compared with
//! [`normalize`] and [`names_match`]; the first candidate in registry order
//! that agrees wins.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::{ConfigError, LeiscopeConfig};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::normalize::{names_match, normalize};
use crate::registry::{EntityRegistry, GleifRegistry};
use crate::verifier::{GeminiVerifier, NameVerifier};
use crate::{EntityRecord, LookupOutcome};

/// Sequences a registry search and a legal-name verification into one outcome.
#[derive(Clone)]
pub struct LeiResolver {
    registry: Arc<dyn EntityRegistry>,
    verifier: Arc<dyn NameVerifier>,
}

impl LeiResolver {
    pub fn new(registry: Arc<dyn EntityRegistry>, verifier: Arc<dyn NameVerifier>) -> Self {
        Self { registry, verifier }
    }

    /// GLEIF registry plus Gemini verifier sharing one HTTP connection pool.
    ///
    /// Fails when the Gemini API key is missing.
    pub fn from_config(config: &LeiscopeConfig) -> Result<Self, ConfigError> {
        let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
        let verifier = GeminiVerifier::with_http_client(Arc::clone(&http_client), config)?;
        let registry = GleifRegistry::with_http_client(http_client, config);

        Ok(Self::new(Arc::new(registry), Arc::new(verifier)))
    }

    pub fn registry(&self) -> &dyn EntityRegistry {
        self.registry.as_ref()
    }

    pub fn verifier(&self) -> &dyn NameVerifier {
        self.verifier.as_ref()
    }

    /// Resolves the LEI of `company_name`, using `website` to confirm which
    /// registry candidate is the right one.
    ///
    /// Never fails: adapter errors become [`LookupOutcome::Failure`] with
    /// kind `LookupError`.
    pub async fn find_lei(&self, company_name: &str, website: &str) -> LookupOutcome {
        let span = info_span!(
            "find_lei",
            lookup_id = %Uuid::new_v4(),
            company = company_name,
            website = website,
        );

        self.resolve(company_name, website).instrument(span).await
    }

    async fn resolve(&self, company_name: &str, website: &str) -> LookupOutcome {
        let records = match self.registry.search_by_name(company_name).await {
            Ok(records) => records,
            Err(error) => {
                warn!(registry = self.registry.id(), error = %error, "registry search failed");
                return LookupOutcome::lookup_error(error);
            }
        };

        if records.is_empty() {
            info!("registry returned no candidates");
            return LookupOutcome::no_records(company_name);
        }
        debug!(candidates = records.len(), "registry candidates found");

        let verification = match self.verifier.verify_legal_name(website).await {
            Ok(verification) => verification,
            Err(error) => {
                warn!(verifier = self.verifier.id(), error = %error, "verification failed");
                return LookupOutcome::lookup_error(error);
            }
        };

        let Some(verified_name) = verification.legal_name.as_deref() else {
            info!("verifier found no legal name");
            return LookupOutcome::name_not_verified();
        };

        match Self::select_match(&records, verified_name) {
            Some(record) => {
                info!(lei = %record.id, legal_name = %record.legal_name, "matched registry record");
                LookupOutcome::Success {
                    lei: record.id.clone(),
                    legal_name: record.legal_name.clone(),
                    address: record.address.clone(),
                    sources: verification.sources,
                    estimated_cost: verification.estimated_cost,
                }
            }
            None => {
                info!(verified_name, "no candidate matched the verified name");
                LookupOutcome::no_match(company_name)
            }
        }
    }

    /// First record, in the given order, whose legal name matches
    /// `verified_name` after normalization.
    ///
    /// Records with an empty legal name are skipped, and a verified name
    /// that normalizes to nothing matches no record.
    pub fn select_match<'r>(
        records: &'r [EntityRecord],
        verified_name: &str,
    ) -> Option<&'r EntityRecord> {
        let verified = normalize(verified_name);
        if verified.is_empty() {
            return None;
        }

        records
            .iter()
            .filter(|record| record.has_legal_name())
            .find(|record| names_match(&normalize(&record.legal_name), &verified))
    }
}

impl std::fmt::Debug for LeiResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeiResolver")
            .field("registry", &self.registry.id())
            .field("verifier", &self.verifier.id())
            .finish()
    }
}
