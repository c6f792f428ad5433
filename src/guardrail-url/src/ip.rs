//! IP address classification for SSRF protection.
//!
//! Classification is a pure function of the address bytes. The policy layer in
//! [`crate::validate`] decides what each class means for a given set of
//! options; the "always blocked" classes are rejected no matter what.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;

/// The class an IP address falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IpClass {
    /// `0.0.0.0/8` or `::`.
    Unspecified,
    /// `255.255.255.255`.
    Broadcast,
    /// `224.0.0.0/4` or `ff00::/8`.
    Multicast,
    /// `127.0.0.0/8` or `::1`.
    Loopback,
    /// `169.254.0.0/16` or `fe80::/10`. Includes cloud metadata endpoints.
    LinkLocal,
    /// `10.0.0.0/8`, `172.16.0.0/12`, `192.168.0.0/16`.
    PrivateRfc1918,
    /// `100.64.0.0/10` (RFC 6598 shared address space).
    CarrierNat,
    /// `198.18.0.0/15` (RFC 2544).
    Benchmark,
    /// `fc00::/7` (RFC 4193).
    UniqueLocal,
    /// Anything else.
    Public,
}

impl IpClass {
    /// Classes that no option combination may expose.
    pub fn is_always_blocked(&self) -> bool {
        matches!(
            self,
            IpClass::Unspecified | IpClass::Broadcast | IpClass::Multicast
        )
    }

    /// Classes treated as private by the URL policy. Loopback is included;
    /// the policy exempts it separately when localhost is allowed.
    pub fn is_private(&self) -> bool {
        matches!(
            self,
            IpClass::Loopback
                | IpClass::LinkLocal
                | IpClass::PrivateRfc1918
                | IpClass::CarrierNat
                | IpClass::Benchmark
                | IpClass::UniqueLocal
        )
    }

    /// Human-readable description used in rejection messages.
    pub fn describe(&self) -> &'static str {
        match self {
            IpClass::Unspecified => "unspecified address",
            IpClass::Broadcast => "broadcast address",
            IpClass::Multicast => "multicast address",
            IpClass::Loopback => "loopback address",
            IpClass::LinkLocal => "link-local address",
            IpClass::PrivateRfc1918 => "private network address",
            IpClass::CarrierNat => "carrier-grade NAT address",
            IpClass::Benchmark => "benchmarking address",
            IpClass::UniqueLocal => "unique local address",
            IpClass::Public => "public address",
        }
    }
}

impl std::fmt::Display for IpClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Classify an IP address.
pub fn classify(ip: IpAddr) -> IpClass {
    match ip {
        IpAddr::V4(ip) => classify_ipv4(ip),
        IpAddr::V6(ip) => classify_ipv6(ip),
    }
}

/// Whether the address is private, loopback, link-local or otherwise internal.
///
/// IPv6 link-local-scope multicast (`ff02::/16`) also counts as private even
/// though its class is [`IpClass::Multicast`].
pub fn is_private(ip: IpAddr) -> bool {
    if let IpAddr::V6(v6) = ip {
        if is_link_local_multicast_ipv6(&v6) {
            return true;
        }
    }
    classify(ip).is_private()
}

/// Whether the address must be rejected regardless of options.
pub fn is_always_blocked(ip: IpAddr) -> bool {
    classify(ip).is_always_blocked()
}

/// Classify an IPv4 address.
pub fn classify_ipv4(ip: Ipv4Addr) -> IpClass {
    if ipv4_in_cidr(ip, [0, 0, 0, 0], 8) {
        return IpClass::Unspecified;
    }
    if ip.is_broadcast() {
        return IpClass::Broadcast;
    }
    if ipv4_in_cidr(ip, [224, 0, 0, 0], 4) {
        return IpClass::Multicast;
    }
    if ipv4_in_cidr(ip, [127, 0, 0, 0], 8) {
        return IpClass::Loopback;
    }
    if ipv4_in_cidr(ip, [169, 254, 0, 0], 16) {
        return IpClass::LinkLocal;
    }
    if ipv4_in_cidr(ip, [10, 0, 0, 0], 8)
        || ipv4_in_cidr(ip, [172, 16, 0, 0], 12)
        || ipv4_in_cidr(ip, [192, 168, 0, 0], 16)
    {
        return IpClass::PrivateRfc1918;
    }
    if ipv4_in_cidr(ip, [100, 64, 0, 0], 10) {
        return IpClass::CarrierNat;
    }
    if ipv4_in_cidr(ip, [198, 18, 0, 0], 15) {
        return IpClass::Benchmark;
    }
    IpClass::Public
}

/// Classify an IPv6 address.
///
/// IPv4-mapped (`::ffff:a.b.c.d`) and IPv4-compatible (`::a.b.c.d`) forms are
/// classified by the embedded IPv4 address.
pub fn classify_ipv6(ip: Ipv6Addr) -> IpClass {
    // :: and ::1 first, before to_ipv4() reinterprets them as 0.0.0.x
    if ip.is_unspecified() {
        return IpClass::Unspecified;
    }
    if ip.is_loopback() {
        return IpClass::Loopback;
    }

    if let Some(v4) = ip.to_ipv4() {
        return classify_ipv4(v4);
    }

    if ip.is_multicast() {
        return IpClass::Multicast;
    }
    if is_link_local_ipv6(&ip) {
        return IpClass::LinkLocal;
    }
    if is_unique_local_ipv6(&ip) {
        return IpClass::UniqueLocal;
    }
    IpClass::Public
}

/// Check if IPv4 is in a CIDR range.
fn ipv4_in_cidr(ip: Ipv4Addr, base: [u8; 4], prefix: u8) -> bool {
    let ip = u32::from(ip);
    let base = u32::from(Ipv4Addr::from(base));
    let mask = if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix)
    };
    (ip & mask) == (base & mask)
}

/// fe80::/10
fn is_link_local_ipv6(ip: &Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xffc0) == 0xfe80
}

/// fc00::/7
fn is_unique_local_ipv6(ip: &Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xfe00) == 0xfc00
}

/// Multicast with link-local scope (ff02::/16, any flags nibble).
fn is_link_local_multicast_ipv6(ip: &Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xff0f) == 0xff02
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(s: &str) -> IpClass {
        classify(s.parse().unwrap())
    }

    #[test]
    fn test_ipv4_special_ranges() {
        assert_eq!(class("0.0.0.0"), IpClass::Unspecified);
        assert_eq!(class("0.255.1.2"), IpClass::Unspecified);
        assert_eq!(class("255.255.255.255"), IpClass::Broadcast);
        assert_eq!(class("224.0.0.1"), IpClass::Multicast);
        assert_eq!(class("239.255.255.255"), IpClass::Multicast);
    }

    #[test]
    fn test_ipv4_private_ranges() {
        assert_eq!(class("127.0.0.1"), IpClass::Loopback);
        assert_eq!(class("127.255.255.255"), IpClass::Loopback);
        assert_eq!(class("10.0.0.1"), IpClass::PrivateRfc1918);
        assert_eq!(class("10.255.255.255"), IpClass::PrivateRfc1918);
        assert_eq!(class("172.16.0.1"), IpClass::PrivateRfc1918);
        assert_eq!(class("172.31.255.255"), IpClass::PrivateRfc1918);
        assert_eq!(class("192.168.1.1"), IpClass::PrivateRfc1918);
        assert_eq!(class("100.64.0.1"), IpClass::CarrierNat);
        assert_eq!(class("100.127.255.255"), IpClass::CarrierNat);
        assert_eq!(class("169.254.169.254"), IpClass::LinkLocal);
        assert_eq!(class("198.18.0.1"), IpClass::Benchmark);
        assert_eq!(class("198.19.255.255"), IpClass::Benchmark);
    }

    #[test]
    fn test_ipv4_range_boundaries() {
        assert_eq!(class("172.15.255.255"), IpClass::Public);
        assert_eq!(class("172.32.0.1"), IpClass::Public);
        assert_eq!(class("192.169.0.1"), IpClass::Public);
        assert_eq!(class("100.63.255.255"), IpClass::Public);
        assert_eq!(class("100.128.0.0"), IpClass::Public);
        assert_eq!(class("198.17.255.255"), IpClass::Public);
        assert_eq!(class("198.20.0.0"), IpClass::Public);
        assert_eq!(class("9.255.255.255"), IpClass::Public);
        assert_eq!(class("11.0.0.0"), IpClass::Public);
    }

    #[test]
    fn test_ipv4_public() {
        assert_eq!(class("8.8.8.8"), IpClass::Public);
        assert_eq!(class("1.1.1.1"), IpClass::Public);
        assert_eq!(class("93.184.216.34"), IpClass::Public);
    }

    #[test]
    fn test_ipv6_ranges() {
        assert_eq!(class("::"), IpClass::Unspecified);
        assert_eq!(class("::1"), IpClass::Loopback);
        assert_eq!(class("0:0:0:0:0:0:0:1"), IpClass::Loopback);
        assert_eq!(class("fe80::1"), IpClass::LinkLocal);
        assert_eq!(class("febf::1"), IpClass::LinkLocal);
        assert_eq!(class("fc00::1"), IpClass::UniqueLocal);
        assert_eq!(class("fdff:ffff::1"), IpClass::UniqueLocal);
        assert_eq!(class("ff02::1"), IpClass::Multicast);
        assert_eq!(class("ff0e::1"), IpClass::Multicast);
        assert_eq!(class("2001:4860:4860::8888"), IpClass::Public);
        assert_eq!(class("2606:4700::1"), IpClass::Public);
    }

    #[test]
    fn test_ipv6_embedded_ipv4() {
        assert_eq!(class("::ffff:127.0.0.1"), IpClass::Loopback);
        assert_eq!(class("::ffff:7f00:1"), IpClass::Loopback);
        assert_eq!(class("::ffff:192.168.0.1"), IpClass::PrivateRfc1918);
        assert_eq!(class("::ffff:169.254.169.254"), IpClass::LinkLocal);
        assert_eq!(class("::ffff:8.8.8.8"), IpClass::Public);
        // IPv4-compatible (deprecated) form
        assert_eq!(class("::127.0.0.1"), IpClass::Loopback);
        assert_eq!(class("::10.1.2.3"), IpClass::PrivateRfc1918);
    }

    #[test]
    fn test_is_private() {
        for ip in [
            "10.0.0.1",
            "172.16.0.1",
            "192.168.255.255",
            "127.0.0.1",
            "100.64.0.1",
            "169.254.0.1",
            "198.18.0.1",
            "::1",
            "fe80::1",
            "ff02::1",
            "fd00::1",
        ] {
            assert!(is_private(ip.parse().unwrap()), "{ip} should be private");
        }

        for ip in ["8.8.8.8", "1.1.1.1", "172.32.0.1", "2001:4860:4860::8888"] {
            assert!(!is_private(ip.parse().unwrap()), "{ip} should be public");
        }
    }

    #[test]
    fn test_always_blocked() {
        assert!(is_always_blocked("0.0.0.0".parse().unwrap()));
        assert!(is_always_blocked("255.255.255.255".parse().unwrap()));
        assert!(is_always_blocked("224.0.0.251".parse().unwrap()));
        assert!(is_always_blocked("::".parse().unwrap()));
        assert!(is_always_blocked("ff05::2".parse().unwrap()));
        assert!(!is_always_blocked("127.0.0.1".parse().unwrap()));
        assert!(!is_always_blocked("10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_ipv4_in_cidr() {
        let ip = Ipv4Addr::new(172, 20, 1, 1);
        assert!(ipv4_in_cidr(ip, [172, 16, 0, 0], 12));
        assert!(!ipv4_in_cidr(ip, [172, 16, 0, 0], 16));
        assert!(ipv4_in_cidr(ip, [0, 0, 0, 0], 0));
    }

    #[test]
    fn test_documentation_ranges_are_public() {
        for ip in ["192.0.2.1", "198.51.100.7", "203.0.113.9", "2001:db8::1"] {
            assert_eq!(classify(ip.parse().unwrap()), IpClass::Public, "{ip}");
        }
    }
}
