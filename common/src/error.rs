//! Error kinds shared across the workspace.
//!
//! Only [`InputError`] and [`UnsupportedPlatform`] are fatal, and only before
//! the first subnet is scanned. [`ProbeError`] collapses to "unreachable" at the
//! coordinator boundary and [`PersistError`] is reported per subnet.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::network::subnet::Subnet;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSubnetError {
    #[error("subnet is empty")]
    Empty,
    #[error("invalid IPv4 address '{0}'")]
    Address(String),
    #[error("invalid prefix length '{0}', expected 0-32")]
    Prefix(String),
    #[error("{0} has host bits set")]
    HostBits(String),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid subnet '{input}': {source}")]
    InvalidSubnet {
        input: String,
        #[source]
        source: InvalidSubnetError,
    },
    #[error("input file '{}' not found", .0.display())]
    FileNotFound(PathBuf),
    #[error("failed to read input file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("no valid subnets found in '{}'", .0.display())]
    NoValidSubnets(PathBuf),
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to collect probe output: {0}")]
    Io(#[from] io::Error),
    #[error("probe did not finish within {0:?}")]
    Deadline(Duration),
    #[error("probe exited successfully but reported no reply")]
    UnexpectedOutput,
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("could not prepare '{}' for {subnet}: {source}", path.display())]
    Io {
        subnet: Subnet,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not write results for {subnet} to '{}': {source}", path.display())]
    Csv {
        subnet: Subnet,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no reachability probe is available for '{0}'")]
pub struct UnsupportedPlatform(pub String);
