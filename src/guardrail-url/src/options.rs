//! URL validation options.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default DNS resolution timeout (5 seconds).
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Schemes accepted when no explicit list is configured.
pub const DEFAULT_SCHEMES: &[&str] = &["http", "https"];

/// Options controlling URL validation.
///
/// `Default` yields the secure configuration: http/https only, localhost and
/// private addresses blocked, hostnames resolved with a 5 second timeout.
///
/// Setting `resolve_host_timeout` to zero disables DNS resolution. A symbolic
/// hostname then passes the IP checks unconditionally and only literal IPs are
/// classified, so the caller's own resolution must be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlOptions {
    /// Allowed schemes, compared case-insensitively. Empty allows any scheme.
    pub allowed_schemes: Vec<String>,

    /// Allow `localhost` and loopback addresses.
    pub allow_localhost: bool,

    /// Allow private, link-local, CGNAT and benchmark addresses.
    pub allow_private_ip: bool,

    /// Timeout for resolving symbolic hostnames. Zero disables resolution.
    #[serde(rename = "resolve_host_timeout_ms", with = "duration_ms")]
    pub resolve_host_timeout: Duration,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            allowed_schemes: DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect(),
            allow_localhost: false,
            allow_private_ip: false,
            resolve_host_timeout: DEFAULT_RESOLVE_TIMEOUT,
        }
    }
}

impl UrlOptions {
    /// Create options with secure defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the allowed scheme list.
    pub fn allowed_schemes(mut self, schemes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.allowed_schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    /// Allow any scheme.
    pub fn any_scheme(mut self) -> Self {
        self.allowed_schemes.clear();
        self
    }

    /// Allow localhost and loopback addresses.
    pub fn allow_localhost(mut self, allow: bool) -> Self {
        self.allow_localhost = allow;
        self
    }

    /// Allow private network addresses.
    pub fn allow_private_ip(mut self, allow: bool) -> Self {
        self.allow_private_ip = allow;
        self
    }

    /// Set the DNS resolution timeout.
    pub fn resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_host_timeout = timeout;
        self
    }

    /// Skip DNS resolution of symbolic hostnames (weaker mode).
    pub fn skip_dns_resolution(mut self) -> Self {
        self.resolve_host_timeout = Duration::ZERO;
        self
    }

    /// Whether symbolic hostnames are resolved.
    pub fn resolves_hosts(&self) -> bool {
        !self.resolve_host_timeout.is_zero()
    }

    /// Check a scheme against the allowlist.
    pub fn is_scheme_allowed(&self, scheme: &str) -> bool {
        self.allowed_schemes.is_empty()
            || self
                .allowed_schemes
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(scheme))
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_secure() {
        let opts = UrlOptions::default();
        assert_eq!(opts.allowed_schemes, vec!["http", "https"]);
        assert!(!opts.allow_localhost);
        assert!(!opts.allow_private_ip);
        assert_eq!(opts.resolve_host_timeout, DEFAULT_RESOLVE_TIMEOUT);
        assert!(opts.resolves_hosts());
    }

    #[test]
    fn test_builder() {
        let opts = UrlOptions::new()
            .allowed_schemes(["ftp", "ftps"])
            .allow_localhost(true)
            .skip_dns_resolution();

        assert!(opts.is_scheme_allowed("FTP"));
        assert!(!opts.is_scheme_allowed("http"));
        assert!(opts.allow_localhost);
        assert!(!opts.resolves_hosts());
    }

    #[test]
    fn test_empty_scheme_list_allows_everything() {
        let opts = UrlOptions::new().any_scheme();
        assert!(opts.is_scheme_allowed("gopher"));
    }
}
