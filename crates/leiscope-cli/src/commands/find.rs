use leiscope_core::{LeiResolver, LeiscopeConfig, ValidationError};

use crate::cli::FindArgs;
use crate::error::CliError;

use super::Report;

pub async fn run(args: &FindArgs, config: &LeiscopeConfig) -> Result<Report, CliError> {
    config.require_api_key()?;

    let company = args.company.trim();
    if company.is_empty() {
        return Err(ValidationError::EmptyCompanyName.into());
    }

    let website = args.website.trim();
    if website.is_empty() {
        return Err(ValidationError::EmptyWebsite.into());
    }

    let resolver = LeiResolver::from_config(config)?;
    let outcome = resolver.find_lei(company, website).await;

    Ok(Report::Find {
        company: company.to_owned(),
        website: website.to_owned(),
        outcome,
    })
}
