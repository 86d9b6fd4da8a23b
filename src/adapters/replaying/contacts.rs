//! Replaying adapter for the `ContactsService` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::RemoteError;
use crate::ports::{
    ChannelRecord, ContactRecord, ContactsService, NewChannel, NewContact, PlanStage,
};

const PORT: &str = "contacts";

/// Replays recorded contacts calls. Arguments are not compared; calls are
/// served in recorded order per method.
pub struct ReplayingContacts {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingContacts {
    /// Creates a replaying adapter from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn replay<T: serde::de::DeserializeOwned>(&self, method: &str) -> Result<T, RemoteError> {
        let output = next_output(&self.replayer, PORT, method);
        replay_result(&output, &format!("{PORT}::{method}"))
    }
}

impl ContactsService for ReplayingContacts {
    fn create_contact(&self, _contact: &NewContact) -> Result<String, RemoteError> {
        self.replay("create_contact")
    }

    fn get_contact(&self, _contact_arn: &str) -> Result<ContactRecord, RemoteError> {
        self.replay("get_contact")
    }

    fn update_contact_plan(
        &self,
        _contact_arn: &str,
        _stages: &[PlanStage],
    ) -> Result<(), RemoteError> {
        self.replay("update_contact_plan")
    }

    fn create_contact_channel(&self, _channel: &NewChannel) -> Result<String, RemoteError> {
        self.replay("create_contact_channel")
    }

    fn list_contact_channels(
        &self,
        _contact_arn: &str,
    ) -> Result<Vec<ChannelRecord>, RemoteError> {
        self.replay("list_contact_channels")
    }

    fn delete_contact_channel(&self, _channel_arn: &str) -> Result<(), RemoteError> {
        self.replay("delete_contact_channel")
    }

    fn delete_contact(&self, _contact_arn: &str) -> Result<(), RemoteError> {
        self.replay("delete_contact")
    }
}
