//! Domain error types.

/// Top-level error type for quantprimer.
#[derive(Debug, thiserror::Error)]
pub enum QuantError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid parameters for {strategy}: {reason}")]
    InvalidParameter { strategy: String, reason: String },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl QuantError {
    pub(crate) fn invalid_parameter(strategy: &str, reason: impl Into<String>) -> Self {
        QuantError::InvalidParameter {
            strategy: strategy.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&QuantError> for std::process::ExitCode {
    fn from(err: &QuantError) -> Self {
        let code: u8 = match err {
            QuantError::Io(_) => 1,
            QuantError::ConfigParse { .. }
            | QuantError::ConfigMissing { .. }
            | QuantError::ConfigInvalid { .. } => 2,
            QuantError::DataSource { .. } => 3,
            QuantError::InvalidParameter { .. } => 4,
            QuantError::NoData { .. } | QuantError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
