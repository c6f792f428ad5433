//! URL validation with SSRF protection.
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. Non-empty input
//! 2. Parse, reject embedded user info
//! 3. Scheme allowlist
//! 4. Non-empty host
//! 5. Literal localhost names (unless localhost is allowed)
//! 6. Literal IP: IP policy
//! 7. Hostname: resolve (if enabled) and apply the IP policy to every address
//!
//! Validation never connects to the target. A caller that follows redirects
//! must validate every redirect location again.

use std::net::IpAddr;

use tracing::debug;
use url::Url;

use crate::error::{UrlError, UrlResult};
use crate::host::TargetHost;
use crate::ip::{IpClass, classify};
use crate::options::UrlOptions;
use crate::resolver::{AsyncHostResolver, HostResolver, SystemResolver, TokioResolver};

/// A URL that passed validation, with the addresses that were checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    url: Url,
    host: TargetHost,
    addresses: Vec<IpAddr>,
}

impl ResolvedTarget {
    /// The parsed URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The URL scheme (lowercase).
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// The target host.
    pub fn host(&self) -> &TargetHost {
        &self.host
    }

    /// Addresses that passed the IP policy.
    ///
    /// Holds the literal IP for IP hosts and the full resolution result for
    /// hostnames. Empty when resolution was disabled.
    pub fn addresses(&self) -> &[IpAddr] {
        &self.addresses
    }

    /// Whether the host's addresses were actually checked.
    pub fn is_resolved(&self) -> bool {
        !self.addresses.is_empty()
    }

    /// Consume and return the parsed URL.
    pub fn into_url(self) -> Url {
        self.url
    }
}

/// Blocking URL validator.
#[derive(Debug, Clone)]
pub struct UrlValidator<R = SystemResolver> {
    options: UrlOptions,
    resolver: R,
}

impl UrlValidator<SystemResolver> {
    /// Create a validator that resolves through the operating system.
    pub fn new(options: UrlOptions) -> Self {
        Self::with_resolver(options, SystemResolver)
    }
}

impl Default for UrlValidator<SystemResolver> {
    fn default() -> Self {
        Self::new(UrlOptions::default())
    }
}

impl<R: HostResolver> UrlValidator<R> {
    /// Create a validator with a custom resolver.
    pub fn with_resolver(options: UrlOptions, resolver: R) -> Self {
        Self { options, resolver }
    }

    /// Get the options.
    pub fn options(&self) -> &UrlOptions {
        &self.options
    }

    /// Validate a URL string.
    pub fn validate(&self, input: &str) -> UrlResult<ResolvedTarget> {
        self.validate_inner(input).inspect_err(log_rejection)
    }

    fn validate_inner(&self, input: &str) -> UrlResult<ResolvedTarget> {
        let (url, host) = parse_target(input, &self.options)?;

        let addresses = match &host {
            TargetHost::Ip(ip) => {
                check_ip_policy(*ip, &self.options)?;
                vec![*ip]
            }
            TargetHost::Domain(name) if self.options.resolves_hosts() => {
                let addrs = self
                    .resolver
                    .resolve(name, self.options.resolve_host_timeout)?;
                check_resolved(name, &addrs, &self.options)?;
                addrs
            }
            TargetHost::Domain(name) => {
                debug!(host = %name, "DNS resolution disabled, hostname not checked against IP policy");
                Vec::new()
            }
        };

        Ok(ResolvedTarget {
            url,
            host,
            addresses,
        })
    }
}

/// Async URL validator, resolving through tokio by default.
#[derive(Debug, Clone)]
pub struct AsyncUrlValidator<R = TokioResolver> {
    options: UrlOptions,
    resolver: R,
}

impl AsyncUrlValidator<TokioResolver> {
    /// Create a validator that resolves with `tokio::net::lookup_host`.
    pub fn new(options: UrlOptions) -> Self {
        Self::with_resolver(options, TokioResolver)
    }
}

impl<R: AsyncHostResolver> AsyncUrlValidator<R> {
    /// Create a validator with a custom resolver.
    pub fn with_resolver(options: UrlOptions, resolver: R) -> Self {
        Self { options, resolver }
    }

    /// Get the options.
    pub fn options(&self) -> &UrlOptions {
        &self.options
    }

    /// Validate a URL string.
    pub async fn validate(&self, input: &str) -> UrlResult<ResolvedTarget> {
        self.validate_inner(input).await.inspect_err(log_rejection)
    }

    async fn validate_inner(&self, input: &str) -> UrlResult<ResolvedTarget> {
        let (url, host) = parse_target(input, &self.options)?;

        let addresses = match &host {
            TargetHost::Ip(ip) => {
                check_ip_policy(*ip, &self.options)?;
                vec![*ip]
            }
            TargetHost::Domain(name) if self.options.resolves_hosts() => {
                let addrs = self
                    .resolver
                    .resolve(name, self.options.resolve_host_timeout)
                    .await?;
                check_resolved(name, &addrs, &self.options)?;
                addrs
            }
            TargetHost::Domain(name) => {
                debug!(host = %name, "DNS resolution disabled, hostname not checked against IP policy");
                Vec::new()
            }
        };

        Ok(ResolvedTarget {
            url,
            host,
            addresses,
        })
    }
}

/// Validate a URL with the system resolver.
pub fn validate_url(input: &str, options: &UrlOptions) -> UrlResult<ResolvedTarget> {
    UrlValidator::new(options.clone()).validate(input)
}

/// Validate a URL with the tokio resolver.
pub async fn validate_url_async(input: &str, options: &UrlOptions) -> UrlResult<ResolvedTarget> {
    AsyncUrlValidator::new(options.clone()).validate(input).await
}

/// Convenience check with default options.
pub fn is_safe_url(input: &str) -> bool {
    validate_url(input, &UrlOptions::default()).is_ok()
}

/// Apply the IP policy to a single address.
///
/// Unspecified, broadcast and multicast addresses are always rejected.
/// Loopback needs `allow_localhost`; other private classes need
/// `allow_private_ip`.
pub fn check_ip_policy(ip: IpAddr, options: &UrlOptions) -> UrlResult<()> {
    let class = classify(ip);

    if class.is_always_blocked() {
        return Err(UrlError::NonRoutable {
            ip,
            reason: class.describe(),
        });
    }

    let loopback = class == IpClass::Loopback;

    if loopback && !options.allow_localhost {
        return Err(UrlError::LoopbackBlocked { ip });
    }

    if !options.allow_private_ip && crate::ip::is_private(ip) {
        if loopback && options.allow_localhost {
            return Ok(());
        }
        return Err(UrlError::PrivateBlocked { ip });
    }

    Ok(())
}

/// Steps 1-5: everything that does not depend on resolution.
fn parse_target(input: &str, options: &UrlOptions) -> UrlResult<(Url, TargetHost)> {
    if input.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = Url::parse(input).map_err(|e| match e {
        url::ParseError::EmptyHost => UrlError::MissingHost,
        other => UrlError::Parse(other.to_string()),
    })?;

    if !url.username().is_empty() || url.password().is_some() {
        return Err(UrlError::UserInfo);
    }

    if !options.is_scheme_allowed(url.scheme()) {
        return Err(UrlError::SchemeNotAllowed {
            scheme: url.scheme().to_string(),
        });
    }

    let host = TargetHost::from_url(&url).ok_or(UrlError::MissingHost)?;

    if !options.allow_localhost && host.is_localhost_name() {
        return Err(UrlError::LocalhostBlocked {
            host: host.to_string(),
        });
    }

    Ok((url, host))
}

/// A round-robin or multi-homed name is only as safe as its least safe address.
fn check_resolved(host: &str, addrs: &[IpAddr], options: &UrlOptions) -> UrlResult<()> {
    if addrs.is_empty() {
        return Err(UrlError::NoAddresses {
            host: host.to_string(),
        });
    }
    for ip in addrs {
        check_ip_policy(*ip, options)?;
    }
    Ok(())
}

fn log_rejection(err: &UrlError) {
    debug!(category = %err.category(), reason = %err, "URL rejected");
}
