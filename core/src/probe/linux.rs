use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use pingr_common::error::ProbeError;
use pingr_common::probe::{ProbeBudget, ReachabilityProbe};

use super::{PING_PROGRAM, deadline, run_ping};

/// iputils `ping`: `-W` takes whole seconds and the exit status reports replies.
///
/// Sub-second budgets are rounded up to `-W 1`. Fractional waits are only
/// understood by recent iputils; busybox and older builds reject them and the
/// host would read as unreachable. The cost is a slower sweep: with the
/// default 100 ms budget each silent host holds a worker for up to 1.5 s
/// before the deadline kills `ping`.
#[derive(Debug, Clone)]
pub struct LinuxPing {
    program: String,
}

impl LinuxPing {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(addr: Ipv4Addr, budget: ProbeBudget) -> Vec<String> {
        vec![
            "-c".to_string(),
            budget.attempts.to_string(),
            "-W".to_string(),
            wait_secs(budget.timeout).to_string(),
            addr.to_string(),
        ]
    }
}

impl Default for LinuxPing {
    fn default() -> Self {
        Self::with_program(PING_PROGRAM)
    }
}

/// Rounds up to the next whole second, never below one.
fn wait_secs(timeout: Duration) -> u64 {
    let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    millis.div_ceil(1_000).max(1)
}

#[async_trait]
impl ReachabilityProbe for LinuxPing {
    fn name(&self) -> &'static str {
        "linux-ping"
    }

    async fn probe(&self, addr: Ipv4Addr, budget: ProbeBudget) -> Result<bool, ProbeError> {
        let per_attempt = Duration::from_secs(wait_secs(budget.timeout));
        let output = run_ping(
            &self.program,
            &Self::args(addr, budget),
            deadline(per_attempt, budget),
        )
        .await?;

        Ok(output.status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_expressed_in_whole_seconds() {
        assert_eq!(wait_secs(Duration::from_millis(100)), 1);
        assert_eq!(wait_secs(Duration::from_millis(1_000)), 1);
        assert_eq!(wait_secs(Duration::from_millis(1_001)), 2);
        assert_eq!(wait_secs(Duration::ZERO), 1);
    }

    #[test]
    fn sub_second_budget_waits_one_whole_second() {
        let budget = ProbeBudget::default();
        let args = LinuxPing::args(Ipv4Addr::new(10, 0, 0, 7), budget);
        assert_eq!(args, ["-c", "1", "-W", "1", "10.0.0.7"]);

        let per_attempt = Duration::from_secs(wait_secs(budget.timeout));
        assert_eq!(deadline(per_attempt, budget), Duration::from_millis(1_500));
    }

    #[test]
    fn builds_count_and_wait_arguments() {
        let args = LinuxPing::args(
            Ipv4Addr::new(10, 0, 0, 7),
            ProbeBudget::new(Duration::from_millis(2_500), 2),
        );
        assert_eq!(args, ["-c", "2", "-W", "3", "10.0.0.7"]);
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn exit_status_decides_reachability() {
        let budget = ProbeBudget::default();
        let addr = Ipv4Addr::LOCALHOST;

        let up = LinuxPing::with_program("true").probe(addr, budget).await;
        assert!(matches!(up, Ok(true)));

        let down = LinuxPing::with_program("false").probe(addr, budget).await;
        assert!(matches!(down, Ok(false)));
    }

    #[tokio::test]
    async fn spawn_failure_is_an_error_not_a_panic() {
        let res = LinuxPing::with_program("/nonexistent/ping")
            .probe(Ipv4Addr::LOCALHOST, ProbeBudget::default())
            .await;
        assert!(matches!(res, Err(ProbeError::Spawn { .. })));
    }
}
