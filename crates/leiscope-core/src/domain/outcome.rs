use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::SourceCitation;

/// Why a lookup did not produce an LEI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The registry returned zero candidates.
    NoRecords,
    /// The verifier found no legal name for the website.
    NameNotVerified,
    /// Candidates and a verified name exist but none of them agree.
    NoMatch,
    /// An adapter failed (bad input, transport, upstream error).
    LookupError,
}

impl FailureKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoRecords => "no_records",
            Self::NameNotVerified => "name_not_verified",
            Self::NoMatch => "no_match",
            Self::LookupError => "lookup_error",
        }
    }
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a full LEI resolution. There is no partial success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    Success {
        lei: String,
        legal_name: String,
        address: String,
        sources: Vec<SourceCitation>,
        estimated_cost: f64,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}

impl LookupOutcome {
    pub fn no_records(company_name: &str) -> Self {
        Self::Failure {
            kind: FailureKind::NoRecords,
            message: format!(
                "No LEI records found for '{company_name}'. This company may not have a registered LEI."
            ),
        }
    }

    pub fn name_not_verified() -> Self {
        Self::Failure {
            kind: FailureKind::NameNotVerified,
            message: String::from("Could not verify company name from the provided website."),
        }
    }

    pub fn no_match(company_name: &str) -> Self {
        Self::Failure {
            kind: FailureKind::NoMatch,
            message: format!(
                "Found LEI records for '{company_name}', but could not verify a match with the \
                 legal name from the website. Please ensure the website URL is accurate."
            ),
        }
    }

    pub fn lookup_error(details: impl Display) -> Self {
        Self::Failure {
            kind: FailureKind::LookupError,
            message: format!("Error during LEI lookup: {details}"),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message, .. } => Some(message),
        }
    }

    pub fn lei(&self) -> Option<&str> {
        match self {
            Self::Success { lei, .. } => Some(lei),
            Self::Failure { .. } => None,
        }
    }
}
