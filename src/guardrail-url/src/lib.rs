//! SSRF-safe URL validation for guardrail.
//!
//! This crate decides whether a URL is safe to contact:
//! - Scheme allowlist (http/https by default)
//! - Rejection of embedded credentials (`user:pass@host`)
//! - Literal localhost names and loopback addresses
//! - Private, link-local, CGNAT and benchmark ranges (IPv4 and IPv6)
//! - Unspecified, broadcast and multicast addresses, always
//! - Every address a hostname resolves to, within a timeout
//!
//! It never makes the request itself. Redirects must be validated again by the
//! caller, and a hostname may resolve differently by the time it is connected to.
//!
//! # Example
//!
//! ```rust,no_run
//! use guardrail_url::{UrlOptions, validate_url};
//!
//! let target = validate_url("https://example.com/api", &UrlOptions::default())?;
//! println!("{} resolved to {:?}", target.host(), target.addresses());
//! # Ok::<(), guardrail_url::UrlError>(())
//! ```

pub mod error;
pub mod host;
pub mod ip;
pub mod options;
pub mod resolver;
pub mod validate;

pub use error::{UrlError, UrlResult};
pub use host::TargetHost;
pub use ip::{IpClass, classify, is_always_blocked, is_private};
pub use options::{DEFAULT_RESOLVE_TIMEOUT, DEFAULT_SCHEMES, UrlOptions};
pub use resolver::{
    AsyncHostResolver, HostResolver, MAX_PENDING_LOOKUPS, StaticResolver, SystemResolver,
    TokioResolver,
};
pub use validate::{
    AsyncUrlValidator, ResolvedTarget, UrlValidator, check_ip_policy, is_safe_url, validate_url,
    validate_url_async,
};
