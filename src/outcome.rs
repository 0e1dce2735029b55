use crate::error::Result;
use serde::Serialize;

/// Result of loading one section of the detail view.
///
/// "Nothing to show" is a valid state of its own and is kept apart from
/// failures.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Loaded(T),
    NoData,
    Failed { message: String, retryable: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// What the user is told when a section has nothing to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub offer_retry: bool,
}

impl<T> LoadOutcome<T> {
    /// `Ok(None)` is "no data", never a failure.
    pub fn from_result(result: Result<Option<T>>) -> Self {
        match result {
            Ok(Some(value)) => Self::Loaded(value),
            Ok(None) => Self::NoData,
            Err(e) => Self::Failed {
                retryable: e.is_retryable(),
                message: e.to_string(),
            },
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_loaded(self) -> Option<T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadOutcome<U> {
        match self {
            Self::Loaded(value) => LoadOutcome::Loaded(f(value)),
            Self::NoData => LoadOutcome::NoData,
            Self::Failed { message, retryable } => LoadOutcome::Failed { message, retryable },
        }
    }

    /// Turns a loaded but empty value into `NoData`.
    pub fn empty_as_no_data(self, is_empty: impl FnOnce(&T) -> bool) -> Self {
        match self {
            Self::Loaded(value) if is_empty(&value) => Self::NoData,
            other => other,
        }
    }

    pub fn notice(&self, section: &str) -> Option<Notice> {
        match self {
            Self::Loaded(_) => None,
            Self::NoData => Some(Notice {
                level: NoticeLevel::Info,
                message: format!("No {} available for this company.", section),
                offer_retry: false,
            }),
            Self::Failed { message, retryable } => Some(Notice {
                level: NoticeLevel::Error,
                message: format!("Unable to load {}: {}", section, message),
                offer_retry: *retryable,
            }),
        }
    }
}
