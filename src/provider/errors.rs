use thiserror::Error;

use super::models::{EventRef, Season};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Fetch timed out for event {event_ref}")]
    Timeout { event_ref: EventRef },

    #[error("No events for player {player_id} in season {season}")]
    NoSuchSeason { player_id: String, season: Season },

    #[error("Malformed event data: {0}")]
    MalformedEventData(String),
}

impl ProviderError {
    /// Whether the caller may retry the request later
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::ProviderUnavailable(_) | ProviderError::Timeout { .. }
        )
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        ProviderError::ProviderUnavailable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        ProviderError::MalformedEventData(msg.into())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::MalformedEventData(err.to_string())
        } else {
            ProviderError::ProviderUnavailable(err.to_string())
        }
    }
}
