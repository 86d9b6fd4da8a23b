//! Port implementations.

#[cfg(feature = "aws")]
pub mod live;
pub mod memory;
pub mod recording;
pub mod replaying;
