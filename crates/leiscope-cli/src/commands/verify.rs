use leiscope_core::{GeminiVerifier, LeiscopeConfig, NameVerifier, ValidationError};

use crate::cli::VerifyArgs;
use crate::error::CliError;

use super::Report;

pub async fn run(args: &VerifyArgs, config: &LeiscopeConfig) -> Result<Report, CliError> {
    let verifier = GeminiVerifier::from_config(config)?;

    let website = args.website.trim();
    if website.is_empty() {
        return Err(ValidationError::EmptyWebsite.into());
    }

    let verification = verifier.verify_legal_name(website).await?;

    Ok(Report::Verify {
        website: website.to_owned(),
        verification,
    })
}
