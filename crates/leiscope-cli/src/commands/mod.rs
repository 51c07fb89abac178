mod find;
mod lookup;
mod search;
mod verify;

use leiscope_core::{EntityRecord, LeiscopeConfig, LookupOutcome, VerificationResult};
use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// What a command produced, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Report {
    Find {
        company: String,
        website: String,
        outcome: LookupOutcome,
    },
    Search {
        query: String,
        records: Vec<EntityRecord>,
    },
    Lookup {
        lei: String,
        record: Option<EntityRecord>,
    },
    Verify {
        website: String,
        verification: VerificationResult,
    },
}

impl Report {
    /// `false` for failure outcomes and empty answers (exit code 1).
    pub fn is_success(&self) -> bool {
        match self {
            Self::Find { outcome, .. } => outcome.is_success(),
            Self::Search { records, .. } => !records.is_empty(),
            Self::Lookup { record, .. } => record.is_some(),
            Self::Verify { verification, .. } => verification.legal_name.is_some(),
        }
    }
}

pub async fn run(cli: &Cli) -> Result<Report, CliError> {
    let config = load_config(cli.timeout_ms)?;

    match &cli.command {
        Command::Find(args) => find::run(args, &config).await,
        Command::Search(args) => search::run(args, &config).await,
        Command::Lookup(args) => lookup::run(args, &config).await,
        Command::Verify(args) => verify::run(args, &config).await,
    }
}

fn load_config(timeout_ms: Option<u64>) -> Result<LeiscopeConfig, CliError> {
    let mut config = LeiscopeConfig::from_env()?;

    if let Some(timeout_ms) = timeout_ms.filter(|timeout| *timeout > 0) {
        config.gleif_timeout_ms = timeout_ms;
        config.gemini_timeout_ms = timeout_ms;
    }

    Ok(config)
}
