use crate::schema::StatementKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompanyInsightError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Company data must include {0}")]
    MissingField(&'static str),

    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    #[error("Registry source unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("Supplementary store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Financial analytics unavailable: {0}")]
    AnalyticsUnavailable(String),

    #[error("More than one {kind} statement for year {year}")]
    DuplicateStatement { kind: StatementKind, year: i32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl CompanyInsightError {
    /// Retrieval failures are worth retrying; bad input is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RegistryUnavailable(_)
            | Self::StoreUnavailable(_)
            | Self::AnalyticsUnavailable(_) => true,
            #[cfg(feature = "http")]
            Self::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompanyInsightError>;
