//! Live adapter for the `IdentityService` port (`aws-sdk-sts`).

use std::sync::Arc;

use aws_sdk_sts::Client;
use tokio::runtime::Runtime;

use super::classify;
use crate::error::RemoteError;
use crate::ports::IdentityService;

/// STS client blocking on a shared runtime.
pub struct LiveIdentity {
    client: Client,
    runtime: Arc<Runtime>,
}

impl LiveIdentity {
    /// Wraps an SDK client.
    #[must_use]
    pub fn new(client: Client, runtime: Arc<Runtime>) -> Self {
        Self { client, runtime }
    }
}

impl IdentityService for LiveIdentity {
    fn account_id(&self) -> Result<String, RemoteError> {
        let output = self
            .runtime
            .block_on(self.client.get_caller_identity().send())
            .map_err(|e| classify(&e))?;
        output
            .account()
            .map(str::to_string)
            .ok_or_else(|| RemoteError::Transport("caller identity has no account".into()))
    }
}
