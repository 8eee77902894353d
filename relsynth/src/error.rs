use thiserror::Error;

/// Errors that abort an operation outright.
///
/// Infeasible inversions and oracle timeouts are ordinary outcomes and never
/// show up here; see [`crate::WitnessResult`] and [`crate::OracleOutcome`].
#[derive(Debug, Error)]
pub enum SynthError {
    /// Bad rule registration, bad configuration value, duplicate catalog entry
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("Unknown relational property '{0}'")]
    UnknownProperty(String),

    /// A value could not be read as the kind an operator slot expects
    #[error("Invalid {expected} value: {message}")]
    InvalidValue { expected: String, message: String },

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SynthError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn invalid_value(expected: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            expected: expected.into(),
            message: message.into(),
        }
    }
}
