//! Error taxonomy for the search pipeline
//!
//! Only [`SearchError`] and [`ValidationError`] ever reach the user. Weather
//! and store errors are returned as values so callers can see them, then
//! discarded where the pipeline degrades gracefully.

use thiserror::Error;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch countries data.";
pub const NO_COUNTRIES_MESSAGE: &str = "No countries found for this continent.";

/// Country-directory lookup failure
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("country directory request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("country directory returned status {0}")]
    Status(u16),

    #[error("country directory returned an unreadable body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Per-item weather lookup failure
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("weather service returned status {0}")]
    Status(u16),

    #[error("weather service returned an unreadable body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// History store failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] redb::Error),

    #[error("history record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("history store unavailable: {0}")]
    Unavailable(String),
}

/// Failures of a submitted search that are shown to the user
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Upstream(#[from] FetchError),

    #[error("country directory returned no countries")]
    NoCountries,
}

impl SearchError {
    /// Fixed user-facing text; upstream details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Upstream(_) => FETCH_FAILED_MESSAGE,
            Self::NoCountries => NO_COUNTRIES_MESSAGE,
        }
    }
}

/// Rejected continent selection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("This field is required.")]
    Missing,

    #[error("Select a valid choice. {0} is not one of the available choices.")]
    InvalidChoice(String),
}
