//! Replaying adapter for the `IdentityService` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::RemoteError;
use crate::ports::IdentityService;

/// Replays recorded identity lookups.
pub struct ReplayingIdentity {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingIdentity {
    /// Creates a replaying adapter from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl IdentityService for ReplayingIdentity {
    fn account_id(&self) -> Result<String, RemoteError> {
        let output = next_output(&self.replayer, "identity", "account_id");
        replay_result(&output, "identity::account_id")
    }
}
