//! Error types for `SheetMeta` operations

use thiserror::Error;

/// Main error type for `SheetMeta` operations
#[derive(Error, Debug)]
pub enum SheetMetaError {
    /// Two attribute fragments disagree, or a dependency target is unusable
    #[error("Invalid composition of '{entity}' at attribute '{attribute}': {reason}")]
    InvalidComposition {
        /// Entity being composed (sheet/column/value)
        entity: String,
        /// Attribute that caused the conflict
        attribute: String,
        /// What went wrong
        reason: String,
    },

    /// The same discriminator key was registered twice within one package
    #[error("Duplicate registry entry for {sheet} {column} = '{value}'")]
    DuplicateEntity {
        /// Sheet kind
        sheet: String,
        /// Discriminator column
        column: String,
        /// Discriminator value
        value: String,
    },

    /// Sheet name that does not map to a known sheet kind
    #[error("Unknown sheet: {0}")]
    UnknownSheet(String),

    /// Configuration package that is not known to the registry
    #[error("Unknown package: {0}")]
    UnknownPackage(String),

    /// Row index outside the snapshot
    #[error("Row {row} is out of range for sheet {sheet} ({len} rows)")]
    RowOutOfRange {
        /// Sheet name
        sheet: String,
        /// Requested row
        row: usize,
        /// Rows in the snapshot
        len: usize,
    },

    /// Parsing errors (snapshots, values)
    #[error("Failed to parse: {message}")]
    ParseError {
        /// Error message
        message: String,
        /// Location if available
        location: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Generic errors with context
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for `SheetMeta` operations
pub type Result<T> = std::result::Result<T, SheetMetaError>;

impl SheetMetaError {
    /// Create a new composition error
    #[must_use]
    pub fn invalid_composition(
        entity: impl Into<String>,
        attribute: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidComposition {
            entity: entity.into(),
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// Create a new parse error
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: None,
        }
    }

    /// Create a new parse error with location
    #[must_use]
    pub fn parse_at(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: Some(location.into()),
        }
    }

    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a generic error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for SheetMetaError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for SheetMetaError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<regex::Error> for SheetMetaError {
    fn from(err: regex::Error) -> Self {
        Self::ParseError {
            message: err.to_string(),
            location: None,
        }
    }
}
