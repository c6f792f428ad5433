//! Input guardrails for network and filesystem operations.
//!
//! Re-exports the URL validator ([`guardrail_url`]) and path validator
//! ([`guardrail_path`]) with a shared TOML configuration, a combined error
//! type and logging setup.
//!
//! # Example
//!
//! ```rust,no_run
//! use guardrail::{GuardrailConfig, ValidationError};
//!
//! fn check(url: &str, upload: &str) -> Result<(), ValidationError> {
//!     let config = GuardrailConfig::load_or_default("guardrail.toml")?;
//!     let target = config.url_validator().validate(url)?;
//!     let path = config.path_validator().validate(upload)?;
//!     println!("fetch {} into {}", target.url(), path.display());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ConfigError, ConfigResult, GuardrailConfig};
pub use error::ValidationError;
pub use logging::{LoggingError, init_logging};

pub use guardrail_common::ErrorCategory;
pub use guardrail_path::{self as path, PathError, PathOptions, PathValidator, validate_path};
pub use guardrail_url::{
    self as url, AsyncUrlValidator, IpClass, ResolvedTarget, UrlError, UrlOptions, UrlValidator,
    validate_url, validate_url_async,
};
