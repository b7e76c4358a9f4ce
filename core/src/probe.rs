//! Reachability probes backed by the system `ping` utility.
//!
//! Exactly one variant is chosen per run, from the detected [`Platform`]:
//! * [`WindowsPing`]: `ping -n <count> -w <ms>`; a reply must appear in the output.
//! * [`LinuxPing`]: `ping -c <count> -W <seconds>`; the exit status decides.
//!
//! The sweep only sees [`ReachabilityProbe`], so the choice is made here once
//! and never re-examined per address.

use std::process::{Output, Stdio};
use std::sync::Arc;
use std::time::Duration;

use pingr_common::error::{ProbeError, UnsupportedPlatform};
use pingr_common::probe::{ProbeBudget, ReachabilityProbe};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::trace;

use crate::system::Platform;

mod linux;
mod windows;

pub use linux::LinuxPing;
pub use windows::WindowsPing;

pub(crate) const PING_PROGRAM: &str = "ping";

/// Slack on top of the probe's own wait for process start-up and teardown.
pub const DEADLINE_OVERHEAD: Duration = Duration::from_millis(500);

/// Pause `ping` inserts between two echo requests of the same invocation.
const ATTEMPT_INTERVAL: Duration = Duration::from_secs(1);

/// Selects the probe variant for `platform`.
pub fn select_probe(platform: &Platform) -> Result<Arc<dyn ReachabilityProbe>, UnsupportedPlatform> {
    match platform {
        Platform::Windows => Ok(Arc::new(WindowsPing::default())),
        Platform::Linux => Ok(Arc::new(LinuxPing::default())),
        Platform::Unsupported(os) => Err(UnsupportedPlatform(os.clone())),
    }
}

/// Upper bound on one probe call, given how long `ping` waits per attempt.
pub(crate) fn deadline(per_attempt: Duration, budget: ProbeBudget) -> Duration {
    let attempts = budget.attempts.max(1);
    per_attempt * attempts + ATTEMPT_INTERVAL * (attempts - 1) + DEADLINE_OVERHEAD
}

/// Runs `program` with `args` and collects its output, killing it once `deadline` passes.
pub(crate) async fn run_ping(
    program: &str,
    args: &[String],
    deadline: Duration,
) -> Result<Output, ProbeError> {
    trace!("Executing: {program} {}", args.join(" "));

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ProbeError::Spawn {
            program: program.to_string(),
            source,
        })?;

    match timeout(deadline, child.wait_with_output()).await {
        Ok(output) => Ok(output?),
        Err(_elapsed) => Err(ProbeError::Deadline(deadline)),
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
