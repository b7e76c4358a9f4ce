//! Checkpoint bookkeeping for sweep progress.
//!
//! The coordinator feeds every completion into a [`CheckpointTracker`]; only
//! counts that land on a checkpoint (first result, 25%, 50%, 75%, done) turn
//! into a [`ProgressEvent`] for the injected [`ProgressReporter`].

use pingr_common::network::subnet::{AddressSet, Subnet};
use pingr_common::progress::{HostSpan, ProgressEvent, ProgressReporter};
use tracing::info;

/// Completion counts that trigger a notification, ascending and without duplicates.
pub fn checkpoints(total: usize) -> Vec<usize> {
    let mut points = vec![1, total / 4, total / 2, total * 3 / 4, total];
    points.retain(|point| *point > 0 && *point <= total);
    points.sort_unstable();
    points.dedup();
    points
}

pub struct CheckpointTracker {
    subnet: Subnet,
    addresses: AddressSet,
    total: usize,
    checkpoints: Vec<usize>,
    last_reported: usize,
}

impl CheckpointTracker {
    pub fn new(subnet: Subnet, addresses: AddressSet) -> Self {
        let total = addresses.len();
        Self {
            subnet,
            addresses,
            total,
            checkpoints: checkpoints(total),
            last_reported: 0,
        }
    }

    /// Records that `completed` outcomes have arrived, `reachable` of them positive.
    pub fn observe(&mut self, completed: usize, reachable: usize) -> Option<ProgressEvent> {
        if completed <= self.last_reported || self.checkpoints.binary_search(&completed).is_err() {
            return None;
        }

        let covered = self.span(self.last_reported, completed);
        self.last_reported = completed;

        if completed == self.total {
            return Some(ProgressEvent::Finished {
                subnet: self.subnet,
                total: self.total,
                reachable,
            });
        }

        let percent = (completed * 100 / self.total) as u8;
        Some(ProgressEvent::Checkpoint {
            subnet: self.subnet,
            completed,
            total: self.total,
            percent,
            covered,
        })
    }

    fn span(&self, from: usize, to: usize) -> Option<HostSpan> {
        let first = self.addresses.get(from)?;
        let last = self.addresses.get(to.checked_sub(1)?)?;
        Some(HostSpan {
            first: first.octets()[3],
            last: last.octets()[3],
        })
    }
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn report(&self, _event: &ProgressEvent) {}
}

/// Writes every notification to the log at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: &ProgressEvent) {
        info!("{event}");
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
