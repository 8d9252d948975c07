use thiserror::Error;

/// Everything the engine can reject.
///
/// Modifier expiry and tier-boundary hits are normal control flow and never
/// show up here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EconError {
    /// Malformed tier table, multiplier or config file. Fatal for the whole batch.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Negative indicators or time moving backwards for a country.
    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },

    /// Zero-length interval in a rate query.
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// A rejected query or constructor argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EconError {
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        EconError::InvalidState {
            reason: reason.into(),
        }
    }

    /// True when the failure only concerns one country and a batch may skip it.
    pub fn is_country_local(&self) -> bool {
        !matches!(self, EconError::InvalidConfiguration(_))
    }
}

pub type EconResult<T> = Result<T, EconError>;
