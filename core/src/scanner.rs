//! The concurrent sweep of a single subnet.
//!
//! [`ScanCoordinator::scan`] submits one probe per address to a bounded set of
//! tokio tasks, paced so the whole subnet is not hit at once. Outcomes come
//! back in whatever order the probes finish; each carries the index of its
//! address, so attribution never depends on completion order.
//!
//! The coordinator is the only consumer of completions and therefore the only
//! owner of the completed/reachable counters. It returns once every address
//! has an outcome.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use pingr_common::config::Config;
use pingr_common::network::subnet::{AddressSet, Subnet};
use pingr_common::probe::{ProbeBudget, ReachabilityProbe};
use pingr_common::progress::ProgressReporter;
use pingr_common::scan::SubnetScanResult;
use tokio::task::JoinSet;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

use crate::progress::CheckpointTracker;

pub struct ScanCoordinator {
    probe: Arc<dyn ReachabilityProbe>,
    budget: ProbeBudget,
    workers: usize,
    pacing: Duration,
}

impl ScanCoordinator {
    pub fn new(probe: Arc<dyn ReachabilityProbe>, cfg: &Config) -> Self {
        Self {
            probe,
            budget: cfg.budget,
            workers: cfg.workers.max(1),
            pacing: cfg.pacing,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Probes every address of `addresses` and returns the complete result.
    pub async fn scan(
        &self,
        subnet: Subnet,
        addresses: AddressSet,
        reporter: &dyn ProgressReporter,
    ) -> SubnetScanResult {
        let total = addresses.len();
        let mut tracker = CheckpointTracker::new(subnet, addresses);
        let mut outcomes: Vec<Option<bool>> = vec![None; total];
        let mut completed: usize = 0;
        let mut reachable: usize = 0;

        let mut pending = addresses.iter().enumerate();
        let mut next = pending.next();
        let mut in_flight: JoinSet<(usize, bool)> = JoinSet::new();

        let pacer = time::sleep(Duration::ZERO);
        tokio::pin!(pacer);

        loop {
            let can_submit = next.is_some() && in_flight.len() < self.workers;

            tokio::select! {
                biased;

                Some(joined) = in_flight.join_next() => {
                    completed += 1;
                    match joined {
                        Ok((idx, up)) => {
                            outcomes[idx] = Some(up);
                            if up {
                                reachable += 1;
                            }
                        }
                        Err(e) => warn!("A probe task in {subnet} did not finish: {e}"),
                    }

                    if let Some(event) = tracker.observe(completed, reachable) {
                        reporter.report(&event);
                    }
                }

                () = &mut pacer, if can_submit => {
                    if let Some((idx, addr)) = next.take() {
                        self.submit(&mut in_flight, idx, addr);
                        next = pending.next();
                        pacer.as_mut().reset(Instant::now() + self.pacing);
                    }
                }

                else => break,
            }
        }

        let missing = outcomes.iter().filter(|o| o.is_none()).count();
        if missing > 0 {
            warn!("{missing} address(es) in {subnet} have no probe outcome, recording them as unreachable");
        }

        let outcomes: Vec<bool> = outcomes.into_iter().map(|o| o.unwrap_or(false)).collect();
        SubnetScanResult::new(subnet, addresses, outcomes)
    }

    fn submit(&self, in_flight: &mut JoinSet<(usize, bool)>, idx: usize, addr: Ipv4Addr) {
        let probe = Arc::clone(&self.probe);
        let budget = self.budget;

        in_flight.spawn(async move {
            let up = match probe.probe(addr, budget).await {
                Ok(up) => up,
                Err(e) => {
                    debug!("Probe of {addr} failed, treating as unreachable: {e}");
                    false
                }
            };
            trace!(
                "{addr} is {}",
                if up { "reachable" } else { "not reachable" }
            );
            (idx, up)
        });
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
