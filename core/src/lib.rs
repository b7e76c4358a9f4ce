//! # Pingr Core
//!
//! The sweep engine: platform probes, the bounded-concurrency coordinator,
//! checkpoint progress, CSV output and the service that ties them together.

pub mod output;
pub mod probe;
pub mod progress;
pub mod scanner;
pub mod sweep;
pub mod system;
