use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Length of an ISO 17442 Legal Entity Identifier.
pub const LEI_LEN: usize = 20;

/// Validated Legal Entity Identifier, normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Lei(String);

impl Lei {
    /// Parse and normalize an LEI code.
    ///
    /// Only the shape is checked (20 ASCII alphanumerics); the ISO 7064
    /// check digits are left to the registry.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();

        let len = normalized.chars().count();
        if len != LEI_LEN {
            return Err(ValidationError::InvalidLeiLength {
                len,
                expected: LEI_LEN,
            });
        }

        for (index, ch) in normalized.chars().enumerate() {
            if !ch.is_ascii_alphanumeric() {
                return Err(ValidationError::InvalidLeiChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Lei {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Lei {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Lei {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Lei> for String {
    fn from(value: Lei) -> Self {
        value.0
    }
}
