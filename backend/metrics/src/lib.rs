//! Operational metrics and health endpoints for the relay.

pub mod registry;
pub mod server;

pub use registry::RelayMetrics;
pub use server::serve;
