//! Legacy-compatible travel reimbursement policy engine with evaluation and calibration
//! tooling.

pub mod calibration;
pub mod config;
pub mod error;
pub mod harness;
pub mod policy;
pub mod sanitize;
pub mod telemetry;

pub use policy::{compute, PolicyConfig, PolicyEngine, TripInput};
