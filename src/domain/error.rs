//! Domain error types.

/// Top-level error type for twapsim.
#[derive(Debug, thiserror::Error)]
pub enum TwapError {
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("cumulative volume is zero at record {index}")]
    DivisionByZero { index: usize },

    #[error("cumulative volume overflows at record {index}")]
    VolumeOverflow { index: usize },

    #[error("failed to export {path}: {reason}")]
    Export { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TwapError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        TwapError::InvalidConfiguration {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&TwapError> for std::process::ExitCode {
    fn from(err: &TwapError) -> Self {
        let code: u8 = match err {
            TwapError::Io(_) | TwapError::Export { .. } => 1,
            TwapError::InvalidConfiguration { .. }
            | TwapError::ConfigParse { .. }
            | TwapError::ConfigInvalid { .. } => 2,
            TwapError::DivisionByZero { .. } | TwapError::VolumeOverflow { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}
