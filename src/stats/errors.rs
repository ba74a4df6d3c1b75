use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Unknown stat key: {0}")]
    UnknownStatKey(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Analysis cancelled")]
    Cancelled,
}

impl StatsError {
    pub fn validation(msg: impl Into<String>) -> Self {
        StatsError::Validation(msg.into())
    }
}
