//! CLI argument definitions for leiscope.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `find` | Resolve a company's LEI from its name and website |
//! | `search` | List GLEIF candidates for a legal name |
//! | `lookup` | Fetch one GLEIF record by LEI |
//! | `verify` | Ask the verifier for a website's legal owner |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `text` | Output format (text, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | per adapter | Request timeout for both adapters |
//! | `-v` | warn | Log verbosity, repeatable |
//!
//! # Examples
//!
//! ```bash
//! # Resolve an LEI (requires GEMINI_API_KEY)
//! leiscope find "Alphabet" https://abc.xyz
//!
//! # Registry candidates only, as JSON
//! leiscope search "Siemens" --country DE --format json --pretty
//!
//! # Direct lookup
//! leiscope lookup 5493006MHB84DD0ZWV18
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// leiscope - Legal Entity Identifier resolution
///
/// Cross-references the GLEIF registry with a grounded web search to find
/// the LEI that belongs to a company's website.
#[derive(Debug, Parser)]
#[command(
    name = "leiscope",
    author,
    version,
    about = "Resolve Legal Entity Identifiers from a company name and website",
    long_about = "leiscope searches the GLEIF registry for a company name, asks Gemini \
(with Google Search grounding) which legal entity operates the website, and returns \
the registry record whose legal name agrees.\n\
\n\
The find and verify commands need GEMINI_API_KEY in the environment.\n\
\n\
Use 'leiscope <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Request timeout in milliseconds for registry and verifier calls.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    ///
    /// RUST_LOG takes precedence when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    Text,
    /// Single JSON object.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a company's LEI from its name and website.
    Find(FindArgs),
    /// List registry candidates for a legal name.
    Search(SearchArgs),
    /// Fetch a registry record by LEI.
    Lookup(LookupArgs),
    /// Ask the verifier which legal entity operates a website.
    Verify(VerifyArgs),
}

#[derive(Debug, Args)]
pub struct FindArgs {
    /// Company name as it might appear in the registry.
    pub company: String,
    /// Company website, e.g. https://abc.xyz
    pub website: String,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Legal name to search for.
    pub name: String,

    /// Restrict to a legal-address country (ISO 3166-1 alpha-2).
    #[arg(long)]
    pub country: Option<String>,

    /// Entity status filter.
    #[arg(long, default_value = "ACTIVE", conflicts_with = "all_statuses")]
    pub status: String,

    /// Include entities of every status.
    #[arg(long, default_value_t = false)]
    pub all_statuses: bool,

    /// Maximum number of candidates (1-200).
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// 20-character Legal Entity Identifier.
    pub lei: String,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Company website.
    pub website: String,
}
