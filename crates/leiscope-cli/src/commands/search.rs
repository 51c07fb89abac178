use leiscope_core::registry::MAX_PAGE_SIZE;
use leiscope_core::{EntityRegistry, GleifRegistry, LeiscopeConfig, RegistrySearch};
use tracing::warn;

use crate::cli::SearchArgs;
use crate::error::CliError;

use super::Report;

pub async fn run(args: &SearchArgs, config: &LeiscopeConfig) -> Result<Report, CliError> {
    if args.limit > MAX_PAGE_SIZE {
        warn!(
            limit = args.limit,
            max = MAX_PAGE_SIZE,
            "limit exceeds the registry page size, clamping"
        );
    }

    let mut request = RegistrySearch::new(&args.name)?.with_page_size(args.limit);
    if let Some(country) = &args.country {
        request = request.with_country(country)?;
    }
    request = if args.all_statuses {
        request.all_statuses()
    } else {
        request.with_status(&args.status)
    };

    let query = request.name.clone();
    let registry = GleifRegistry::from_config(config);
    let records = registry.search(request).await?;

    Ok(Report::Search { query, records })
}
