use thiserror::Error;

/// Rejections produced when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The value was empty.
    #[error("{kind} must not be empty")]
    Empty {
        /// Identifier type being parsed.
        kind: &'static str,
    },
    /// The value is not a well-formed identifier of this type.
    #[error("malformed {kind} '{value}'")]
    Malformed {
        /// Identifier type being parsed.
        kind: &'static str,
        /// Rejected input.
        value: String,
    },
}

impl ValidationError {
    /// Identifier type that failed to parse.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty { kind } | Self::Malformed { kind, .. } => kind,
        }
    }
}
