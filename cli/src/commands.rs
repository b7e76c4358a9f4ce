pub mod sweep;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use pingr_common::config::{self, Config};
use pingr_common::network::target::Target;
use pingr_common::probe::{self as probe_cfg, ProbeBudget};

#[derive(Parser)]
#[command(name = "pingr")]
#[command(about = "Sweep IPv4 subnets and record which hosts answer a ping.")]
#[command(group(ArgGroup::new("target").required(true).args(["network", "input"])))]
pub struct CommandLine {
    /// Subnet to sweep in CIDR notation (e.g., 192.168.1.0/24)
    #[arg(short, long, value_name = "CIDR")]
    pub network: Option<String>,

    /// CSV file with one subnet per line, in the first column
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Per-attempt reply timeout in milliseconds
    #[arg(short, long, value_name = "MS", default_value_t = probe_cfg::DEFAULT_TIMEOUT.as_millis() as u64)]
    pub timeout: u64,

    /// Echo requests per address
    #[arg(short, long, value_name = "N", default_value_t = probe_cfg::DEFAULT_ATTEMPTS)]
    pub count: u32,

    /// Probes allowed in flight at once [default: 4 per core, at most 256]
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Delay between two probe submissions in milliseconds
    #[arg(long, value_name = "MS", default_value_t = config::DEFAULT_PACING.as_millis() as u64)]
    pub pacing: u64,

    /// Directory for the per-subnet CSV files
    #[arg(short, long, value_name = "DIR", default_value = config::DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Hide progress checkpoints and the spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn target(&self) -> anyhow::Result<Target> {
        match (&self.network, &self.input) {
            (Some(network), _) => Target::from_network(network).context("cannot sweep the given network"),
            (None, Some(path)) => Ok(Target::File(path.clone())),
            (None, None) => anyhow::bail!("either --network or --input is required"),
        }
    }

    pub fn to_config(&self) -> Config {
        Config {
            budget: ProbeBudget::new(Duration::from_millis(self.timeout), self.count),
            workers: self.workers.unwrap_or_else(config::default_workers).max(1),
            pacing: Duration::from_millis(self.pacing),
            output_dir: self.output_dir.clone(),
            quiet: self.quiet,
        }
    }
}
