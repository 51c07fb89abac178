use std::fmt::Write as _;
use std::io::{self, Write};

use leiscope_core::{EntityRecord, LookupOutcome, SourceCitation, VerificationResult};

use crate::cli::OutputFormat;
use crate::commands::Report;
use crate::error::CliError;

pub fn render(report: &Report, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let payload = match format {
        OutputFormat::Json if pretty => serde_json::to_string_pretty(report)?,
        OutputFormat::Json => serde_json::to_string(report)?,
        OutputFormat::Text => render_text(report),
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", payload.trim_end())?;
    Ok(())
}

pub fn render_text(report: &Report) -> String {
    let mut out = String::new();

    match report {
        Report::Find { outcome, .. } => match outcome {
            LookupOutcome::Success {
                lei,
                legal_name,
                address,
                sources,
                estimated_cost,
            } => {
                line(&mut out, format_args!("LEI found: {lei}"));
                line(&mut out, format_args!("  Legal name   : {legal_name}"));
                line(&mut out, format_args!("  Legal address: {}", or_dash(address)));
                write_sources(&mut out, sources);
                write_cost(&mut out, *estimated_cost);
            }
            LookupOutcome::Failure { message, .. } => line(&mut out, format_args!("{message}")),
        },
        Report::Search { query, records } => {
            if records.is_empty() {
                line(&mut out, format_args!("No LEI records found for '{query}'."));
            } else {
                line(
                    &mut out,
                    format_args!("{} candidate(s) for '{query}':", records.len()),
                );
                for record in records {
                    line(
                        &mut out,
                        format_args!(
                            "  {}  {}  [{}] {}",
                            record.id,
                            record.legal_name,
                            or_dash(&record.status),
                            or_dash(&record.country)
                        ),
                    );
                }
            }
        }
        Report::Lookup { lei, record } => match record {
            Some(record) => write_record(&mut out, record),
            None => line(&mut out, format_args!("No LEI record found for {lei}.")),
        },
        Report::Verify { verification, .. } => write_verification(&mut out, verification),
    }

    out
}

fn write_record(out: &mut String, record: &EntityRecord) {
    let fields = [
        ("LEI", record.id.as_str()),
        ("Legal name", record.legal_name.as_str()),
        ("Status", record.status.as_str()),
        ("Category", record.category.as_str()),
        ("Jurisdiction", record.jurisdiction.as_str()),
        ("Legal address", record.address.as_str()),
        ("Registered", record.registration_date.as_str()),
        ("Last update", record.last_update.as_str()),
    ];

    for (label, value) in fields {
        line(out, format_args!("{label:<13}: {}", or_dash(value)));
    }
}

fn write_verification(out: &mut String, verification: &VerificationResult) {
    match &verification.legal_name {
        Some(name) => line(out, format_args!("Legal name: {name}")),
        None => line(
            out,
            format_args!("Could not verify company name from the provided website."),
        ),
    }
    write_sources(out, &verification.sources);
    write_cost(out, verification.estimated_cost);
}

fn write_sources(out: &mut String, sources: &[SourceCitation]) {
    if sources.is_empty() {
        return;
    }

    line(out, format_args!("Sources:"));
    for (index, source) in sources.iter().enumerate() {
        let title = if source.title.is_empty() {
            &source.url
        } else {
            &source.title
        };
        line(out, format_args!("  {}. {title} ({})", index + 1, source.url));
    }
}

fn write_cost(out: &mut String, estimated_cost: f64) {
    line(out, format_args!("Estimated cost: ${estimated_cost:.6} USD"));
}

fn line(out: &mut String, args: std::fmt::Arguments<'_>) {
    // Writing into a String cannot fail.
    let _ = out.write_fmt(args);
    out.push('\n');
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
