//! Caller identity port.

use crate::error::RemoteError;

/// Resolves who the tool is acting as.
pub trait IdentityService: Send + Sync {
    /// Returns the caller's account id, used to build resource ARNs.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller cannot be identified.
    fn account_id(&self) -> Result<String, RemoteError>;
}
