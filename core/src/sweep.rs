//! # Sweep Service
//!
//! Implements the "sweep these subnets" use case.
//!
//! Orchestrates a run by:
//! 1. scanning each subnet through the [`ScanCoordinator`], one subnet at a time.
//! 2. handing every finished result to the [`ResultSink`] before moving on.
//!
//! Probe, progress reporter and sink are injected, so the service never knows
//! which platform it runs on or where results end up.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pingr_common::config::Config;
use pingr_common::network::subnet::Subnet;
use pingr_common::probe::ReachabilityProbe;
use pingr_common::progress::ProgressReporter;
use pingr_common::scan::{PersistRecord, ScanSession};
use pingr_common::sink::ResultSink;
use tracing::{error, info, warn};

use crate::scanner::ScanCoordinator;

pub struct SweepService {
    coordinator: ScanCoordinator,
    reporter: Box<dyn ProgressReporter>,
    sink: Box<dyn ResultSink>,
}

impl SweepService {
    pub fn new(
        probe: Arc<dyn ReachabilityProbe>,
        reporter: Box<dyn ProgressReporter>,
        sink: Box<dyn ResultSink>,
        cfg: &Config,
    ) -> Self {
        Self {
            coordinator: ScanCoordinator::new(probe, cfg),
            reporter,
            sink,
        }
    }

    /// Sweeps `subnets` in order.
    ///
    /// `stop` is checked before each subnet; a subnet that has started always
    /// runs to completion and is persisted.
    pub async fn run(&self, subnets: Vec<Subnet>, stop: &AtomicBool) -> ScanSession {
        let mut session = ScanSession::default();
        let total = subnets.len();

        for (done, subnet) in subnets.into_iter().enumerate() {
            if stop.load(Ordering::Relaxed) {
                warn!("Stop requested, skipping {} remaining subnet(s)", total - done);
                session.interrupted = true;
                break;
            }

            let addresses = subnet.hosts();
            info!("Starting scan of subnet {subnet} ({} hosts)...", addresses.len());

            let result = self
                .coordinator
                .scan(subnet, addresses, self.reporter.as_ref())
                .await;

            let outcome = self.sink.persist(&result);
            match &outcome {
                Ok(path) => info!("Results for {subnet} saved to {}", path.display()),
                Err(e) => error!("{e}"),
            }

            session.persisted.push(PersistRecord { subnet, outcome });
            session.results.push(result);
        }

        session
    }
}
