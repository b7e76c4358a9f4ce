use std::net::Ipv4Addr;

use async_trait::async_trait;
use pingr_common::error::ProbeError;
use pingr_common::probe::{ProbeBudget, ReachabilityProbe};

use super::{PING_PROGRAM, deadline, run_ping};

/// Marker the Windows `ping` prints for every echo reply.
const REPLY_MARKER: &str = "Reply from";

/// Windows `ping`: `-w` takes milliseconds and a zero exit status alone is not trusted.
#[derive(Debug, Clone)]
pub struct WindowsPing {
    program: String,
}

impl WindowsPing {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(addr: Ipv4Addr, budget: ProbeBudget) -> Vec<String> {
        vec![
            "-n".to_string(),
            budget.attempts.to_string(),
            "-w".to_string(),
            budget.timeout.as_millis().to_string(),
            addr.to_string(),
        ]
    }
}

impl Default for WindowsPing {
    fn default() -> Self {
        Self::with_program(PING_PROGRAM)
    }
}

fn interpret(success: bool, stdout: &[u8]) -> Result<bool, ProbeError> {
    if !success {
        return Ok(false);
    }
    if String::from_utf8_lossy(stdout).contains(REPLY_MARKER) {
        Ok(true)
    } else {
        Err(ProbeError::UnexpectedOutput)
    }
}

#[async_trait]
impl ReachabilityProbe for WindowsPing {
    fn name(&self) -> &'static str {
        "windows-ping"
    }

    async fn probe(&self, addr: Ipv4Addr, budget: ProbeBudget) -> Result<bool, ProbeError> {
        let output = run_ping(
            &self.program,
            &Self::args(addr, budget),
            deadline(budget.timeout, budget),
        )
        .await?;

        interpret(output.status.success(), &output.stdout)
    }
}
