use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AuthError {
    #[error("Authentication Required: {message} {location}")]
    TokenRequired {
        message: String,
        location: ErrorLocation,
    },
}

impl AuthError {
    #[track_caller]
    pub fn token_required() -> Self {
        AuthError::TokenRequired {
            message: String::from("this operation needs a GitHub token (set GITHUB_TOKEN)"),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
