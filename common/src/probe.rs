//! The reachability probe boundary.
//!
//! The sweep engine only knows this trait. Concrete probes (one per platform
//! family) live in `pingr-core` and are selected once at startup.

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProbeError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);
pub const DEFAULT_ATTEMPTS: u32 = 1;

/// Time a probe may spend on one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeBudget {
    /// Wait for a reply, per attempt.
    pub timeout: Duration,
    /// Echo requests sent by the underlying probe. Never retried beyond this.
    pub attempts: u32,
}

impl ProbeBudget {
    pub fn new(timeout: Duration, attempts: u32) -> Self {
        Self {
            timeout,
            attempts: attempts.max(1),
        }
    }
}

impl Default for ProbeBudget {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_ATTEMPTS)
    }
}

#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Short name used in logs, e.g. `unix-ping`.
    fn name(&self) -> &'static str;

    /// Checks whether `addr` answers within `budget`.
    ///
    /// `Ok(false)` means the host did not answer. `Err` means the probe itself
    /// could not produce an answer; callers treat that as unreachable too.
    async fn probe(&self, addr: Ipv4Addr, budget: ProbeBudget) -> Result<bool, ProbeError>;
}
