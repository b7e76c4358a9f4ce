use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::probe::ProbeBudget;

const WORKERS_PER_CORE: usize = 4;
const MAX_WORKERS: usize = 256;

pub const DEFAULT_PACING: Duration = Duration::from_millis(100);
pub const DEFAULT_OUTPUT_DIR: &str = "results";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Timeout and attempt count handed to every probe.
    pub budget: ProbeBudget,
    /// Upper bound on probes in flight for one subnet.
    pub workers: usize,
    /// Delay between two probe submissions.
    ///
    /// Zero disables pacing and leaves admission to the worker bound.
    pub pacing: Duration,
    /// Directory that receives one CSV file per subnet.
    pub output_dir: PathBuf,
    /// Suppresses progress notifications.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            budget: ProbeBudget::default(),
            workers: default_workers(),
            pacing: DEFAULT_PACING,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            quiet: false,
        }
    }
}

/// A small multiple of the available cores, capped so a large machine cannot flood the segment.
pub fn default_workers() -> usize {
    let cores = thread::available_parallelism().map_or(1, |n| n.get());
    (cores * WORKERS_PER_CORE).min(MAX_WORKERS)
}
