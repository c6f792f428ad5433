//! Hostname resolution seams.
//!
//! The URL validator never talks to DNS directly; it goes through a
//! [`HostResolver`] (blocking) or [`AsyncHostResolver`] (tokio). Tests plug in
//! [`StaticResolver`] so decision logic can be exercised without a network.
//!
//! Resolution happens once, at validation time. Nothing is cached, and a name
//! that resolves differently when the caller later connects (DNS rebinding) is
//! not detected here.

use std::collections::HashMap;
use std::net::{IpAddr, ToSocketAddrs};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use crate::error::{UrlError, UrlResult};

/// Blocking hostname resolution with a timeout.
pub trait HostResolver: Send + Sync {
    /// Resolve `host` to every address it maps to.
    ///
    /// An empty vector is a valid answer; the validator rejects it.
    fn resolve(&self, host: &str, timeout: Duration) -> UrlResult<Vec<IpAddr>>;
}

/// Async hostname resolution with a timeout.
#[async_trait]
pub trait AsyncHostResolver: Send + Sync {
    /// Resolve `host` to every address it maps to.
    async fn resolve(&self, host: &str, timeout: Duration) -> UrlResult<Vec<IpAddr>>;
}

impl<R: HostResolver + ?Sized> HostResolver for &R {
    fn resolve(&self, host: &str, timeout: Duration) -> UrlResult<Vec<IpAddr>> {
        (**self).resolve(host, timeout)
    }
}

/// Upper bound on lookup threads alive at once, process-wide.
pub const MAX_PENDING_LOOKUPS: usize = 64;

static PENDING_LOOKUPS: AtomicUsize = AtomicUsize::new(0);

/// A reserved lookup thread; released when the thread finishes.
struct LookupSlot {
    counter: &'static AtomicUsize,
}

impl LookupSlot {
    fn acquire(counter: &'static AtomicUsize, limit: usize) -> Option<Self> {
        counter
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < limit).then_some(n + 1)
            })
            .ok()
            .map(|_| Self { counter })
    }
}

impl Drop for LookupSlot {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Resolver backed by the operating system (`getaddrinfo`).
///
/// The lookup runs on a short-lived helper thread so the caller can stop
/// waiting once the timeout elapses. A timed-out lookup keeps running in the
/// background until the OS gives up; its result is discarded. At most
/// [`MAX_PENDING_LOOKUPS`] helper threads exist at once; beyond that a lookup
/// fails immediately with a resolution error.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn resolve(&self, host: &str, timeout: Duration) -> UrlResult<Vec<IpAddr>> {
        let slot = LookupSlot::acquire(&PENDING_LOOKUPS, MAX_PENDING_LOOKUPS)
            .ok_or_else(|| resolution_error(host, "too many pending lookups"))?;
        let (tx, rx) = mpsc::channel();
        let lookup_host = host.to_string();

        std::thread::Builder::new()
            .name("guardrail-dns".to_string())
            .spawn(move || {
                let _slot = slot;
                let result = (lookup_host.as_str(), 0u16)
                    .to_socket_addrs()
                    .map(|addrs| addrs.map(|addr| addr.ip()).collect::<Vec<_>>());
                // Receiver is gone if the caller already timed out.
                let _ = tx.send(result);
            })
            .map_err(|e| resolution_error(host, e))?;

        match rx.recv_timeout(timeout) {
            Ok(Ok(addrs)) => {
                let addrs = dedup(addrs);
                trace!(host, count = addrs.len(), "resolved host");
                Ok(addrs)
            }
            Ok(Err(e)) => Err(resolution_error(host, e)),
            Err(RecvTimeoutError::Timeout) => Err(UrlError::ResolutionTimeout {
                host: host.to_string(),
                timeout,
            }),
            Err(RecvTimeoutError::Disconnected) => {
                Err(resolution_error(host, "resolver thread exited"))
            }
        }
    }
}

/// Resolver backed by `tokio::net::lookup_host`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioResolver;

#[async_trait]
impl AsyncHostResolver for TokioResolver {
    async fn resolve(&self, host: &str, timeout: Duration) -> UrlResult<Vec<IpAddr>> {
        let lookup = tokio::net::lookup_host((host, 0u16));

        match tokio::time::timeout(timeout, lookup).await {
            Ok(Ok(addrs)) => {
                let addrs = dedup(addrs.map(|addr| addr.ip()).collect());
                trace!(host, count = addrs.len(), "resolved host");
                Ok(addrs)
            }
            Ok(Err(e)) => Err(resolution_error(host, e)),
            Err(_) => Err(UrlError::ResolutionTimeout {
                host: host.to_string(),
                timeout,
            }),
        }
    }
}

/// Resolver answering from a fixed table. Unknown hosts fail to resolve.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    entries: HashMap<String, Vec<IpAddr>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `host` (case-insensitive) to `addrs`.
    pub fn with_host(mut self, host: &str, addrs: impl IntoIterator<Item = IpAddr>) -> Self {
        self.entries
            .insert(host.to_ascii_lowercase(), addrs.into_iter().collect());
        self
    }

    fn lookup(&self, host: &str) -> UrlResult<Vec<IpAddr>> {
        self.entries
            .get(&host.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| resolution_error(host, "no such host"))
    }
}

impl HostResolver for StaticResolver {
    fn resolve(&self, host: &str, _timeout: Duration) -> UrlResult<Vec<IpAddr>> {
        self.lookup(host)
    }
}

#[async_trait]
impl AsyncHostResolver for StaticResolver {
    async fn resolve(&self, host: &str, _timeout: Duration) -> UrlResult<Vec<IpAddr>> {
        self.lookup(host)
    }
}

fn resolution_error(host: &str, message: impl ToString) -> UrlError {
    UrlError::Resolution {
        host: host.to_string(),
        message: message.to_string(),
    }
}

/// Drop repeated addresses (getaddrinfo returns one entry per socket type).
fn dedup(addrs: Vec<IpAddr>) -> Vec<IpAddr> {
    let mut unique = Vec::with_capacity(addrs.len());
    for addr in addrs {
        if !unique.contains(&addr) {
            unique.push(addr);
        }
    }
    unique
}
