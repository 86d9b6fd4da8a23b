//! Cassettes: YAML recordings of remote-service interactions.
//!
//! A recording session wraps the live ports and appends every call to one
//! cassette per port. Replaying serves the recorded outputs back, in order,
//! per port and method, so workflows can be exercised without credentials.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
