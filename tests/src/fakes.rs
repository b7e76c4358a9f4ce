//! In-process stand-ins for the system ping and for the result sink.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pingr_common::error::{PersistError, ProbeError};
use pingr_common::network::subnet::Subnet;
use pingr_common::probe::{ProbeBudget, ReachabilityProbe};
use pingr_common::progress::{ProgressEvent, ProgressReporter};
use pingr_common::scan::SubnetScanResult;
use pingr_common::sink::ResultSink;
use pingr_core::output::CsvResultSink;

/// Answers for a fixed set of addresses and stays silent for the rest.
pub struct ScriptedProbe {
    up: HashSet<Ipv4Addr>,
}

impl ScriptedProbe {
    pub fn new(up: impl IntoIterator<Item = Ipv4Addr>) -> Self {
        Self {
            up: up.into_iter().collect(),
        }
    }

    /// No address ever answers.
    pub fn silent() -> Self {
        Self { up: HashSet::new() }
    }
}

#[async_trait]
impl ReachabilityProbe for ScriptedProbe {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn probe(&self, addr: Ipv4Addr, _budget: ProbeBudget) -> Result<bool, ProbeError> {
        tokio::task::yield_now().await;
        Ok(self.up.contains(&addr))
    }
}

/// Every invocation fails, as if `ping` could not be started.
pub struct FailingProbe;

#[async_trait]
impl ReachabilityProbe for FailingProbe {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn probe(&self, _addr: Ipv4Addr, _budget: ProbeBudget) -> Result<bool, ProbeError> {
        Err(ProbeError::UnexpectedOutput)
    }
}

/// Keeps every event; clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingProgress {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Raises `stop` as soon as the first subnet finishes, like a Ctrl+C mid-run.
pub struct StopAfterFirstSubnet {
    pub stop: Arc<AtomicBool>,
}

impl ProgressReporter for StopAfterFirstSubnet {
    fn report(&self, event: &ProgressEvent) {
        if matches!(event, ProgressEvent::Finished { .. }) {
            self.stop.store(true, Ordering::Relaxed);
        }
    }
}

/// Writes through to a [`CsvResultSink`] except for one subnet, which is refused.
pub struct RefusingSink {
    pub inner: CsvResultSink,
    pub refused: Subnet,
}

impl ResultSink for RefusingSink {
    fn persist(&self, result: &SubnetScanResult) -> Result<PathBuf, PersistError> {
        if result.subnet() == self.refused {
            return Err(PersistError::Io {
                subnet: self.refused,
                path: self.inner.path_for(self.refused),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.inner.persist(result)
    }
}
