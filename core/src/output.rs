//! CSV persistence of subnet results.
//!
//! One file per subnet, named `<DDMMMYYYY>_ping results_<subnet>.csv` inside the
//! output directory. The name depends only on the date and the subnet, so a
//! second run on the same day replaces the earlier file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use pingr_common::error::PersistError;
use pingr_common::network::subnet::Subnet;
use pingr_common::scan::SubnetScanResult;
use pingr_common::sink::ResultSink;
use tracing::debug;

pub const HEADER: [&str; 2] = ["IP Address", "Reachable"];

pub struct CsvResultSink {
    dir: PathBuf,
    date: Option<NaiveDate>,
}

impl CsvResultSink {
    /// Writes into `dir`, stamping files with today's local date.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            date: None,
        }
    }

    /// Pins the date used in file names.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(&self, subnet: Subnet) -> String {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        format!("{}_ping results_{}.csv", date_stamp(date), subnet.file_stem())
    }

    pub fn path_for(&self, subnet: Subnet) -> PathBuf {
        self.dir.join(self.file_name(subnet))
    }
}

/// `15JUN2025` style stamp.
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%d%b%Y").to_string().to_uppercase()
}

impl ResultSink for CsvResultSink {
    fn persist(&self, result: &SubnetScanResult) -> Result<PathBuf, PersistError> {
        let subnet = result.subnet();
        let io_err = |path: &Path, source: io::Error| PersistError::Io {
            subnet,
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(|e| io_err(&self.dir, e))?;

        let path = self.path_for(subnet);
        let staging = path.with_extension("csv.part");

        if let Err(source) = write_rows(&staging, result) {
            let _ = fs::remove_file(&staging);
            return Err(PersistError::Csv {
                subnet,
                path: staging,
                source,
            });
        }

        if let Err(e) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(io_err(&path, e));
        }
        debug!("Wrote {} rows to {}", result.len(), path.display());
        Ok(path)
    }
}

fn write_rows(path: &Path, result: &SubnetScanResult) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for (addr, up) in result.iter() {
        writer.write_record([addr.to_string(), up.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
