//! Website-to-legal-name verification.
//!
//! A verifier answers one question: which legal entity owns and operates a
//! website. Implementations report the name (if any), the pages they cited,
//! and what the call cost.

mod gemini;

use std::future::Future;
use std::pin::Pin;

pub use gemini::{GeminiVerifier, GEMINI_SOURCE_ID};

use crate::{SourceError, VerificationResult};

/// Per-million-token pricing in USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            input_per_million: 0.075,
            output_per_million: 0.30,
        }
    }
}

impl Pricing {
    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        (input_tokens as f64 / 1_000_000.0) * self.input_per_million
            + (output_tokens as f64 / 1_000_000.0) * self.output_per_million
    }
}

/// Question sent to the verifier for `website`.
pub fn verification_prompt(website: &str) -> String {
    format!(
        "What is the official legal name for the company that owns and operates the website {website}?"
    )
}

/// Legal-name verifier contract.
pub trait NameVerifier: Send + Sync {
    fn id(&self) -> &'static str;

    /// Looks up the legal name behind `website`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the website is blank or every attempt
    /// failed. "Nothing found" is `Ok` with `legal_name: None`.
    fn verify_legal_name<'a>(
        &'a self,
        website: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<VerificationResult, SourceError>> + Send + 'a>>;
}
