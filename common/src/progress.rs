use std::fmt;

use crate::network::subnet::Subnet;

/// Last-octet boundaries of the addresses covered between two checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostSpan {
    pub first: u8,
    pub last: u8,
}

impl fmt::Display for HostSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, ".{}", self.first)
        } else {
            write!(f, ".{}-.{}", self.first, self.last)
        }
    }
}

/// A notification emitted at a completion checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// An intermediate checkpoint (first completion, 25%, 50% or 75%).
    Checkpoint {
        subnet: Subnet,
        completed: usize,
        total: usize,
        percent: u8,
        covered: Option<HostSpan>,
    },
    /// Every address of the subnet has an outcome.
    Finished {
        subnet: Subnet,
        total: usize,
        reachable: usize,
    },
}

impl ProgressEvent {
    pub fn subnet(&self) -> Subnet {
        match self {
            ProgressEvent::Checkpoint { subnet, .. } | ProgressEvent::Finished { subnet, .. } => {
                *subnet
            }
        }
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Checkpoint {
                subnet,
                completed,
                total,
                percent,
                covered,
            } => {
                write!(
                    f,
                    "Scanning subnet {subnet}... {percent}% complete ({completed}/{total})"
                )?;
                if let Some(span) = covered {
                    write!(f, " covered {span}")?;
                }
                Ok(())
            }
            ProgressEvent::Finished {
                subnet, reachable, ..
            } => write!(
                f,
                "Scanning subnet {subnet}... 100% complete. Found {reachable} reachable hosts."
            ),
        }
    }
}

/// Receives checkpoint notifications from the sweep.
///
/// Called synchronously by the coordinator; implementations must return quickly
/// and must not influence the scan.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}
