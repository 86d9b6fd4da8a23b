//! Classification of create calls.

use crate::error::RemoteError;

/// Result of asking the service to create something that may already exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The resource was created; carries its new ARN.
    Created(String),
    /// The resource was already there.
    AlreadyExists,
    /// Any other failure.
    Failed(RemoteError),
}

impl From<Result<String, RemoteError>> for CreateOutcome {
    fn from(result: Result<String, RemoteError>) -> Self {
        match result {
            Ok(arn) => Self::Created(arn),
            Err(err) if err.is_conflict() => Self::AlreadyExists,
            Err(err) => Self::Failed(err),
        }
    }
}

/// What happened to one remote resource during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStatus {
    /// Created in this run.
    Created,
    /// Already present; nothing created.
    AlreadyExists,
    /// Missing; a live run would create it.
    WouldCreate,
}

impl ResourceStatus {
    /// Short label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::AlreadyExists => "already exists",
            Self::WouldCreate => "would create",
        }
    }
}
