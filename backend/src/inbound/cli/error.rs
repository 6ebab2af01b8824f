//! Errors raised by the command-line adapter.

use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::OnboardingError;
use crate::domain::ports::OnboardingStoreError;

/// Failure of one CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// The service rejected the operation.
    #[error(transparent)]
    Domain(#[from] OnboardingError),
    /// The store could not be opened.
    #[error(transparent)]
    Store(#[from] OnboardingStoreError),
    /// The command result could not be encoded.
    #[error("failed to encode command output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// Error document written to stdout for rejected operations.
    ///
    /// Only domain rejections have one; infrastructure failures are reported
    /// on stderr instead.
    #[must_use]
    pub fn to_document(&self) -> Option<Value> {
        match self {
            Self::Domain(error) => Some(json!({
                "error": {
                    "code": error.code().as_str(),
                    "message": error.message(),
                }
            })),
            Self::Store(_) | Self::Encode(_) => None,
        }
    }
}
