//! Errors surfaced by the sync and annotation pipelines

use thiserror::Error;

use crate::infrastructure::parsing_error::ParsingError;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Page unreachable, non-success status or empty body
    #[error("Failed to fetch {url}: {message}")]
    FetchFailure { url: String, message: String },

    /// Reviews naming cards that are not on the board
    #[error("No board card for {} review(s): {}", .unmatched.len(), .unmatched.join(", "))]
    ValidationFailure { unmatched: Vec<String> },

    /// Classifier output with no list of that name on the board
    #[error("No list named '{list}' on the board (needed for '{card}')")]
    ConfigurationFailure { list: String, card: String },

    #[error("Board {operation} failed: {message}")]
    BoardFailure { operation: String, message: String },

    #[error(transparent)]
    Parsing(#[from] ParsingError),
}

impl SyncError {
    pub fn fetch(url: &str, error: &anyhow::Error) -> Self {
        Self::FetchFailure {
            url: url.to_string(),
            message: format!("{error:#}"),
        }
    }

    pub fn board(operation: &str, error: &anyhow::Error) -> Self {
        Self::BoardFailure {
            operation: operation.to_string(),
            message: format!("{error:#}"),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_lists_names() {
        let error = SyncError::ValidationFailure {
            unmatched: vec!["Beta".to_string(), "Gamma".to_string()],
        };
        assert_eq!(error.to_string(), "No board card for 2 review(s): Beta, Gamma");
    }

    #[test]
    fn fetch_failure_keeps_error_chain() {
        let source = anyhow::anyhow!("connection refused").context("HTTP request failed");
        let error = SyncError::fetch("https://feed/page/2/", &source);
        assert_eq!(
            error.to_string(),
            "Failed to fetch https://feed/page/2/: HTTP request failed: connection refused"
        );
    }
}
