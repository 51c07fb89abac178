use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// A web page the verifier cited while answering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub url: String,
    pub title: String,
}

impl SourceCitation {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Output of one legal-name verification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// `None` when nothing authoritative was found.
    pub legal_name: Option<String>,
    /// Citations in the order the verifier reported them.
    pub sources: Vec<SourceCitation>,
    /// Estimated spend in USD, `0.0` when unknown.
    pub estimated_cost: f64,
}

impl VerificationResult {
    /// Builds a result, treating a blank name as absent.
    pub fn new(
        legal_name: Option<String>,
        sources: Vec<SourceCitation>,
        estimated_cost: f64,
    ) -> Result<Self, ValidationError> {
        if !estimated_cost.is_finite() {
            return Err(ValidationError::NonFiniteValue {
                field: "estimated_cost",
            });
        }
        if estimated_cost < 0.0 {
            return Err(ValidationError::NegativeValue {
                field: "estimated_cost",
            });
        }

        let legal_name = legal_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty());

        Ok(Self {
            legal_name,
            sources,
            estimated_cost,
        })
    }

    pub fn named(legal_name: impl Into<String>) -> Self {
        Self {
            legal_name: Some(legal_name.into()),
            sources: Vec::new(),
            estimated_cost: 0.0,
        }
    }

    pub fn unverified() -> Self {
        Self {
            legal_name: None,
            sources: Vec::new(),
            estimated_cost: 0.0,
        }
    }

    pub fn with_sources(mut self, sources: Vec<SourceCitation>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_estimated_cost(mut self, estimated_cost: f64) -> Self {
        self.estimated_cost = estimated_cost;
        self
    }
}
