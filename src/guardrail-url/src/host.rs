//! Host extraction and normalization.

use std::net::IpAddr;

use url::{Host, Url};

/// Hostnames rejected by literal match when localhost is not allowed.
const LOCALHOST_NAMES: &[&str] = &["localhost", "127.0.0.1", "::1"];

/// The host component of a validated URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetHost {
    /// A literal IPv4 or IPv6 address.
    Ip(IpAddr),

    /// A symbolic hostname (lowercased, trailing dot removed).
    Domain(String),
}

impl TargetHost {
    /// Extract the host from a parsed URL. Returns `None` when the URL has no
    /// host or the host is empty.
    ///
    /// Non-special schemes keep their host opaque in the `url` crate, so a
    /// domain that parses as an IP address is promoted to [`TargetHost::Ip`].
    pub fn from_url(url: &Url) -> Option<Self> {
        match url.host()? {
            Host::Ipv4(ip) => Some(TargetHost::Ip(IpAddr::V4(ip))),
            Host::Ipv6(ip) => Some(TargetHost::Ip(IpAddr::V6(ip))),
            Host::Domain(domain) => {
                let normalized = normalize_domain(domain);
                if normalized.is_empty() {
                    return None;
                }
                match strip_brackets(&normalized).parse::<IpAddr>() {
                    Ok(ip) => Some(TargetHost::Ip(ip)),
                    Err(_) => Some(TargetHost::Domain(normalized)),
                }
            }
        }
    }

    /// Whether this host is one of the literal localhost names.
    pub fn is_localhost_name(&self) -> bool {
        let text = self.to_string();
        LOCALHOST_NAMES.contains(&text.as_str())
    }

    /// The literal IP, if any.
    pub fn ip(&self) -> Option<IpAddr> {
        match self {
            TargetHost::Ip(ip) => Some(*ip),
            TargetHost::Domain(_) => None,
        }
    }
}

impl std::fmt::Display for TargetHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetHost::Ip(ip) => write!(f, "{}", ip),
            TargetHost::Domain(domain) => f.write_str(domain),
        }
    }
}

/// Lowercase, strip a single trailing dot (FQDN form).
fn normalize_domain(domain: &str) -> String {
    let mut host = domain.to_ascii_lowercase();
    if host.ends_with('.') {
        host.pop();
    }
    host
}

fn strip_brackets(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}
