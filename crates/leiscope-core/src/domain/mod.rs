//! # Domain Models
//!
//! Transient values that flow through a single LEI resolution.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`EntityRecord`] | One registry candidate |
//! | [`Lei`] | Validated 20-character identifier |
//! | [`VerificationResult`] | Verified legal name, citations and cost |
//! | [`SourceCitation`] | A cited web page |
//! | [`LookupOutcome`] | Tagged success/failure returned to callers |
//! | [`FailureKind`] | Structured reason for a failed lookup |
//!
//! Adapters build these at their parsing boundary, defaulting missing fields,
//! so the reconciliation engine never checks for field presence.

mod entity;
mod lei;
mod outcome;
mod verification;

pub use entity::{format_address, EntityRecord};
pub use lei::{Lei, LEI_LEN};
pub use outcome::{FailureKind, LookupOutcome};
pub use verification::{SourceCitation, VerificationResult};
