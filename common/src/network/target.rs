//! # Sweep Target Model
//!
//! Defines the possible inputs for a sweep.
//!
//! A target is either:
//! * A single CIDR block given on the command line (e.g., `192.168.1.0/24`).
//! * A CSV file listing one subnet per record, in the first column.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::InputError;
use crate::network::subnet::{LARGE_SUBNET_PREFIX, Subnet};

/// Represents where the subnets to sweep come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// A single subnet, already validated.
    Subnet(Subnet),
    /// A file that still has to be read and validated.
    File(PathBuf),
}

impl Target {
    /// Parses a subnet string given directly by the user.
    pub fn from_network(s: &str) -> Result<Self, InputError> {
        s.parse::<Subnet>()
            .map(Target::Subnet)
            .map_err(|source| InputError::InvalidSubnet {
                input: s.to_string(),
                source,
            })
    }
}

/// Resolves a target into the ordered list of subnets to sweep.
pub fn to_subnets(target: Target) -> Result<Vec<Subnet>, InputError> {
    let subnets = match target {
        Target::Subnet(subnet) => vec![subnet],
        Target::File(path) => read_subnet_file(&path)?,
    };

    for subnet in &subnets {
        info!("Parsed subnet {subnet} into {} IP addresses", subnet.hosts().len());
        if subnet.is_large() {
            warn!(
                "Subnet {subnet} is wider than /{LARGE_SUBNET_PREFIX}; the sweep keeps every outcome in memory and will take a long time"
            );
        }
    }

    Ok(subnets)
}

/// Reads a subnet file from disk.
///
/// A missing file is reported as [`InputError::FileNotFound`] so the caller can
/// exit before any scanning begins.
pub fn read_subnet_file(path: &Path) -> Result<Vec<Subnet>, InputError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => InputError::FileNotFound(path.to_path_buf()),
        _ => InputError::Read {
            path: path.to_path_buf(),
            source: e.into(),
        },
    })?;

    parse_subnet_records(file, path)
}

/// Parses subnet records from any reader.
///
/// Blank records are ignored, malformed subnets are skipped with a warning and
/// repeated subnets are kept once, in first-seen order. Fails when nothing valid remains.
pub fn parse_subnet_records<R: Read>(reader: R, origin: &Path) -> Result<Vec<Subnet>, InputError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut seen: HashSet<Subnet> = HashSet::new();
    let mut subnets: Vec<Subnet> = Vec::new();

    for record in csv_reader.records() {
        let record = record.map_err(|source| InputError::Read {
            path: origin.to_path_buf(),
            source,
        })?;

        let Some(field) = record.get(0) else {
            continue;
        };
        if field.is_empty() {
            continue;
        }

        match field.parse::<Subnet>() {
            Ok(subnet) => {
                if seen.insert(subnet) {
                    subnets.push(subnet);
                } else {
                    warn!("Skipping duplicate subnet '{field}'");
                }
            }
            Err(e) => warn!("Skipping invalid subnet '{field}': {e}"),
        }
    }

    if subnets.is_empty() {
        return Err(InputError::NoValidSubnets(origin.to_path_buf()));
    }

    Ok(subnets)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
