//! URL validation errors.

use std::net::IpAddr;
use std::time::Duration;

use guardrail_common::ErrorCategory;
use thiserror::Error;

/// Reasons a URL is rejected.
///
/// Each variant is a distinct rejection category so callers can branch on it;
/// [`UrlError::category`] collapses them into the coarse taxonomy.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL cannot be empty")]
    Empty,

    #[error("invalid URL format: {0}")]
    Parse(String),

    #[error("URL must not contain user info (user:pass@host)")]
    UserInfo,

    #[error("scheme {scheme:?} is not allowed")]
    SchemeNotAllowed { scheme: String },

    #[error("URL must contain a valid host")]
    MissingHost,

    #[error("access to localhost (loopback) is not allowed: {host}")]
    LocalhostBlocked { host: String },

    #[error("access to loopback address is not allowed: {ip}")]
    LoopbackBlocked { ip: IpAddr },

    #[error("access to private IP address is not allowed: {ip}")]
    PrivateBlocked { ip: IpAddr },

    #[error("access to non-routable address is not allowed: {ip} ({reason})")]
    NonRoutable { ip: IpAddr, reason: &'static str },

    #[error("failed to resolve host {host:?}: {message}")]
    Resolution { host: String, message: String },

    #[error("resolving host {host:?} timed out after {timeout:?}")]
    ResolutionTimeout { host: String, timeout: Duration },

    #[error("host {host:?} resolved to no addresses")]
    NoAddresses { host: String },
}

/// Result type for URL validation.
pub type UrlResult<T> = Result<T, UrlError>;

impl UrlError {
    /// Coarse category of this failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            UrlError::Empty | UrlError::Parse(_) | UrlError::MissingHost => ErrorCategory::Format,
            UrlError::UserInfo
            | UrlError::SchemeNotAllowed { .. }
            | UrlError::LocalhostBlocked { .. }
            | UrlError::LoopbackBlocked { .. }
            | UrlError::PrivateBlocked { .. }
            | UrlError::NonRoutable { .. } => ErrorCategory::Policy,
            UrlError::Resolution { .. }
            | UrlError::ResolutionTimeout { .. }
            | UrlError::NoAddresses { .. } => ErrorCategory::Resolution,
        }
    }

    /// The offending address for IP policy rejections.
    pub fn blocked_ip(&self) -> Option<IpAddr> {
        match self {
            UrlError::LoopbackBlocked { ip }
            | UrlError::PrivateBlocked { ip }
            | UrlError::NonRoutable { ip, .. } => Some(*ip),
            _ => None,
        }
    }
}
