use std::path::PathBuf;

use crate::error::PersistError;
use crate::scan::SubnetScanResult;

/// Durable storage for finished subnet results.
pub trait ResultSink: Send + Sync {
    /// Writes one record for the subnet and returns where it went.
    ///
    /// Writing the same subnet twice on the same day replaces the earlier record.
    fn persist(&self, result: &SubnetScanResult) -> Result<PathBuf, PersistError>;
}
