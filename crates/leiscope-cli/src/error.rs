use leiscope_core::{ConfigError, SourceError, SourceErrorKind};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] leiscope_core::ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 3,
            Self::Source(error) => match error.kind() {
                SourceErrorKind::InvalidRequest => 2,
                _ => 1,
            },
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }

    /// Setup guidance printed after the error message.
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Config(ConfigError::MissingApiKey { .. }) => Some(
                "get a key at https://aistudio.google.com/apikey, then run: \
                 export GEMINI_API_KEY=<your key>",
            ),
            _ => None,
        }
    }
}
