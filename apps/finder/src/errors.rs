use thiserror::Error;

use crate::account::AccountError;
use crate::directory::DirectoryError;

pub const SEARCH_UNAVAILABLE: &str = "Searching temporarily unavailable";
pub const NETWORK_ERROR: &str = "Network error. Please try again.";

/// How a failure is handled at the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or non-2xx. Shown inline; earlier results stay visible.
    TransportFailure,
    /// Rejected input. The message is shown verbatim.
    ValidationFailure,
    Internal,
}

/// Application-level error type.
/// `user_message` is the only text that reaches the page; details go to the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Search pipeline has shut down")]
    PipelineClosed,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Directory(_) => ErrorKind::TransportFailure,
            AppError::Account(AccountError::Http(_)) => ErrorKind::TransportFailure,
            AppError::Account(AccountError::Rejected { .. } | AccountError::Validation(_)) => {
                ErrorKind::ValidationFailure
            }
            AppError::Account(AccountError::Parse(_))
            | AppError::PipelineClosed
            | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The text shown on the page. Internal details never appear here.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Directory(_) => SEARCH_UNAVAILABLE.to_string(),
            AppError::Account(AccountError::Http(_)) => NETWORK_ERROR.to_string(),
            AppError::Account(e @ (AccountError::Rejected { .. } | AccountError::Validation(_))) => {
                e.to_string()
            }
            AppError::Account(AccountError::Parse(_)) => {
                "Unexpected response from the service".to_string()
            }
            AppError::PipelineClosed => "Search is no longer running".to_string(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    /// Logs the failure once, at a level chosen by its kind, and returns the
    /// message for the page.
    pub fn report(&self, context: &str) -> String {
        match self.kind() {
            ErrorKind::TransportFailure => tracing::warn!("{context}: {self}"),
            ErrorKind::ValidationFailure => tracing::debug!("{context}: {self}"),
            ErrorKind::Internal => tracing::error!("{context}: {self:?}"),
        }
        self.user_message()
    }
}
