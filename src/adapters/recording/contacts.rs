//! Recording adapter for the `ContactsService` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::RemoteError;
use crate::ports::{
    ChannelRecord, ContactRecord, ContactsService, NewChannel, NewContact, PlanStage,
};

const PORT: &str = "contacts";

/// Records contacts calls while delegating to an inner implementation.
pub struct RecordingContacts {
    inner: Box<dyn ContactsService>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingContacts {
    /// Wraps `inner`, appending each call to `recorder`.
    pub fn new(inner: Box<dyn ContactsService>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct ContactInput<'a> {
    contact_arn: &'a str,
}

#[derive(Serialize)]
struct ChannelInput<'a> {
    channel_arn: &'a str,
}

#[derive(Serialize)]
struct PlanInput<'a> {
    contact_arn: &'a str,
    stages: &'a [PlanStage],
}

impl ContactsService for RecordingContacts {
    fn create_contact(&self, contact: &NewContact) -> Result<String, RemoteError> {
        let result = self.inner.create_contact(contact);
        record_result(&self.recorder, PORT, "create_contact", contact, &result);
        result
    }

    fn get_contact(&self, contact_arn: &str) -> Result<ContactRecord, RemoteError> {
        let result = self.inner.get_contact(contact_arn);
        record_result(&self.recorder, PORT, "get_contact", &ContactInput { contact_arn }, &result);
        result
    }

    fn update_contact_plan(
        &self,
        contact_arn: &str,
        stages: &[PlanStage],
    ) -> Result<(), RemoteError> {
        let result = self.inner.update_contact_plan(contact_arn, stages);
        let input = PlanInput { contact_arn, stages };
        record_result(&self.recorder, PORT, "update_contact_plan", &input, &result);
        result
    }

    fn create_contact_channel(&self, channel: &NewChannel) -> Result<String, RemoteError> {
        let result = self.inner.create_contact_channel(channel);
        record_result(&self.recorder, PORT, "create_contact_channel", channel, &result);
        result
    }

    fn list_contact_channels(&self, contact_arn: &str) -> Result<Vec<ChannelRecord>, RemoteError> {
        let result = self.inner.list_contact_channels(contact_arn);
        let input = ContactInput { contact_arn };
        record_result(&self.recorder, PORT, "list_contact_channels", &input, &result);
        result
    }

    fn delete_contact_channel(&self, channel_arn: &str) -> Result<(), RemoteError> {
        let result = self.inner.delete_contact_channel(channel_arn);
        let input = ChannelInput { channel_arn };
        record_result(&self.recorder, PORT, "delete_contact_channel", &input, &result);
        result
    }

    fn delete_contact(&self, contact_arn: &str) -> Result<(), RemoteError> {
        let result = self.inner.delete_contact(contact_arn);
        let input = ContactInput { contact_arn };
        record_result(&self.recorder, PORT, "delete_contact", &input, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryIncidentManager;
    use crate::cassette::format::Cassette;

    #[test]
    fn records_success_and_conflict() {
        let dir = std::env::temp_dir().join("oncall_rec_contacts_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("contacts.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "test", "abc")));

        {
            let im = InMemoryIncidentManager::new("us-east-1", "111122223333");
            let contacts = RecordingContacts::new(Box::new(im), Arc::clone(&recorder));
            let request = NewContact { alias: "a".into(), display_name: "A".into() };
            contacts.create_contact(&request).unwrap();
            assert!(contacts.create_contact(&request).unwrap_err().is_conflict());
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let cassette: Cassette =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cassette.interactions.len(), 2);
        assert_eq!(cassette.interactions[0].input["alias"], "a");
        assert!(cassette.interactions[0].output.get("Ok").is_some());
        assert_eq!(cassette.interactions[1].output["Err"]["kind"], "conflict");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
