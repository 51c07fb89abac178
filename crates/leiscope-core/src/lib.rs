//! # Leiscope Core
//!
//! Resolves a company's Legal Entity Identifier from its name and website.
//!
//! ## Overview
//!
//! A lookup cross-references two independent sources:
//!
//! - the **GLEIF registry**, searched by legal name for candidate records
//! - a **grounded AI verifier** (Gemini with Google Search), asked which legal
//!   entity operates the website
//!
//! and keeps the first registry candidate whose normalized legal name agrees
//! with the verified one.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Environment-driven settings |
//! | [`domain`] | Records, identifiers and outcomes |
//! | [`error`] | Validation, configuration and adapter errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`normalize`] | Legal-name canonicalization and matching |
//! | [`registry`] | Registry trait and the GLEIF adapter |
//! | [`resolver`] | Reconciliation engine |
//! | [`retry`] | Retry policy and backoff |
//! | [`throttling`] | Client-side rate limiting |
//! | [`verifier`] | Verifier trait and the Gemini adapter |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use leiscope_core::{LeiResolver, LeiscopeConfig, LookupOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LeiscopeConfig::from_env()?;
//!     let resolver = LeiResolver::from_config(&config)?;
//!
//!     match resolver.find_lei("Alphabet", "https://abc.xyz").await {
//!         LookupOutcome::Success { lei, legal_name, .. } => println!("{legal_name}: {lei}"),
//!         LookupOutcome::Failure { message, .. } => eprintln!("{message}"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Caller   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │   LeiResolver   │────▶│ normalize        │
//! └──┬───────────┬──┘     └──────────────────┘
//!    │ 1         │ 2
//!    ▼           ▼
//! ┌────────┐ ┌──────────┐     ┌──────────────────┐
//! │ GLEIF  │ │ Gemini   │────▶│ RetryPolicy      │
//! └───┬────┘ └────┬─────┘     └──────────────────┘
//!     │           │
//!     ▼           ▼
//! ┌─────────────────┐
//! │  HttpClient     │
//! │  (reqwest)      │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Adapters return [`SourceError`]; the resolver folds every adapter error
//! into a [`LookupOutcome::Failure`]:
//!
//! ```rust
//! use leiscope_core::{FailureKind, LookupOutcome};
//!
//! fn exit_code(outcome: &LookupOutcome) -> i32 {
//!     match outcome.failure_kind() {
//!         None => 0,
//!         Some(FailureKind::LookupError) => 2,
//!         Some(_) => 1,
//!     }
//! }
//!
//! assert_eq!(exit_code(&LookupOutcome::name_not_verified()), 1);
//! ```
//!
//! ## Security
//!
//! - The Gemini API key is read from the environment and never logged
//! - Both upstreams are reached over HTTPS only
//! - Inputs are validated before any request is sent

pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod normalize;
pub mod registry;
pub mod resolver;
pub mod retry;
pub mod throttling;
pub mod verifier;

// Configuration
pub use config::{ConfigError, LeiscopeConfig};

// Domain models
pub use domain::{
    format_address, EntityRecord, FailureKind, Lei, LookupOutcome, SourceCitation,
    VerificationResult, LEI_LEN,
};

// Error types
pub use error::{SourceError, SourceErrorKind, ValidationError};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};

// Matching
pub use normalize::{names_match, normalize};

// Registry
pub use registry::{EntityRegistry, GleifRegistry, RegistrySearch};

// Reconciliation
pub use resolver::LeiResolver;

// Retry logic
pub use retry::{Backoff, RetryPolicy};

// Throttling
pub use throttling::RequestThrottle;

// Verifier
pub use verifier::{GeminiVerifier, NameVerifier, Pricing};
