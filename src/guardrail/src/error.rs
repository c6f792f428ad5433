//! Combined error type for callers using both validators.

use guardrail_common::ErrorCategory;
use guardrail_path::PathError;
use guardrail_url::UrlError;
use thiserror::Error;

use crate::config::ConfigError;

/// Any guardrail failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Url(#[from] UrlError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ValidationError {
    /// Category of the underlying failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ValidationError::Url(e) => e.category(),
            ValidationError::Path(e) => e.category(),
            ValidationError::Config(e) => e.category(),
        }
    }

    /// Whether the input itself was at fault, as opposed to the environment.
    pub fn is_caller_error(&self) -> bool {
        self.category().is_caller_error()
    }
}
