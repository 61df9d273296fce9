//! Domain error types.
//!
//! The recommendation engines never fail; these errors cover construction,
//! configuration, ingestion and report output.

/// Top-level error type for atlas.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid holding {symbol:?}: {reason}")]
    InvalidHolding { symbol: String, reason: String },

    #[error("holdings ingest error in {source_name}: {reason}")]
    Ingest { source_name: String, reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AtlasError {
    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        AtlasError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            AtlasError::Io(_) => 1,
            AtlasError::ConfigParse { .. } | AtlasError::ConfigInvalid { .. } => 2,
            AtlasError::InvalidHolding { .. } | AtlasError::Ingest { .. } => 3,
            AtlasError::Report { .. } => 4,
        }
    }
}

impl From<&AtlasError> for std::process::ExitCode {
    fn from(err: &AtlasError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
