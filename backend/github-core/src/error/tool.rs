use crate::error::operation::OperationError;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ToolError {
    #[error("Unknown Tool: '{id}' {location}")]
    UnknownTool { id: String, location: ErrorLocation },

    #[error("Invalid Tool Input: {message} {location}")]
    InvalidInput {
        message: String,
        location: ErrorLocation,
    },

    #[error("Tool Output Error: {message} {location}")]
    Output {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl ToolError {
    #[track_caller]
    pub fn unknown_tool(id: impl Into<String>) -> Self {
        ToolError::UnknownTool {
            id: id.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ToolError::InvalidInput {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn output(message: impl Into<String>) -> Self {
        ToolError::Output {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Input problems caught before any network call.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ToolError::InvalidInput { .. }
                | ToolError::Operation(OperationError::InvalidInput { .. })
        )
    }
}
