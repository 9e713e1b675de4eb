use crate::error::github_client::GithubClientError;

use common::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;

use thiserror::Error as ThisError;

/// Domain operations, used to prefix errors from their mandatory fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    RepositoryInfo,
    IssueListing,
    UserInfo,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Search => "search GitHub",
            Operation::RepositoryInfo => "get repository info",
            Operation::IssueListing => "list issues",
            Operation::UserInfo => "get user info",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, ThisError)]
pub enum OperationError {
    #[error("Invalid Input: {message} {location}")]
    InvalidInput {
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to {operation}: {source}")]
    Request {
        operation: Operation,
        #[source]
        source: GithubClientError,
    },
}

impl OperationError {
    #[track_caller]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        OperationError::InvalidInput {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn request(operation: Operation, source: GithubClientError) -> Self {
        OperationError::Request { operation, source }
    }

    /// The client classification behind a failed mandatory fetch.
    pub fn client_error(&self) -> Option<&GithubClientError> {
        match self {
            OperationError::Request { source, .. } => Some(source),
            OperationError::InvalidInput { .. } => None,
        }
    }
}
