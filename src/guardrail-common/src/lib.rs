//! Common types shared across guardrail crates.
//!
//! Every validator error maps onto one [`ErrorCategory`] so callers can decide
//! how to surface a failure (reject the request, log internally, retry the
//! lookup later) without matching on each crate's concrete error enum.

use serde::{Deserialize, Serialize};

/// Broad classification of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Malformed input: unparsable URL, empty path, and so on.
    Format,

    /// Well-formed input that the configured policy rejects.
    Policy,

    /// DNS lookup failed, timed out, or returned nothing.
    Resolution,

    /// Filesystem access failed for a reason other than non-existence.
    Io,
}

impl ErrorCategory {
    /// Short lowercase label, suitable for structured log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Format => "format",
            ErrorCategory::Policy => "policy",
            ErrorCategory::Resolution => "resolution",
            ErrorCategory::Io => "io",
        }
    }

    /// Whether the failure was caused by the caller's input rather than the
    /// environment. Format and policy failures are permanent for a given input.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, ErrorCategory::Format | ErrorCategory::Policy)
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
