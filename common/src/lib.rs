//! # Pingr Common
//!
//! Shared models, configuration and the trait boundaries between the sweep
//! engine (`pingr-core`) and the outside world (`pingr-cli`).
//!
//! * **[`network`]**: subnets, address sets and input targets.
//! * **[`probe`]**, **[`progress`]**, **[`sink`]**: traits implemented by adapters.
//! * **[`scan`]**: per-subnet results and the session that groups them.

pub mod config;
pub mod error;
pub mod network;
pub mod probe;
pub mod progress;
pub mod scan;
pub mod sink;
