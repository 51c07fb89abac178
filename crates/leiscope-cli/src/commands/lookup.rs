use leiscope_core::{EntityRegistry, GleifRegistry, Lei, LeiscopeConfig};

use crate::cli::LookupArgs;
use crate::error::CliError;

use super::Report;

pub async fn run(args: &LookupArgs, config: &LeiscopeConfig) -> Result<Report, CliError> {
    let lei = Lei::parse(&args.lei)?;

    let registry = GleifRegistry::from_config(config);
    let record = registry.lookup(&lei).await?;

    Ok(Report::Lookup {
        lei: lei.into(),
        record,
    })
}
