//! In-process simulation of the incident-management service.
//!
//! One [`InMemoryIncidentManager`] implements all three ports over shared
//! state, so a context built from clones of it behaves like a single remote
//! account. It enforces the same rules the real service does for the calls
//! the workflows make (alias uniqueness, channel-name uniqueness per
//! contact, engaged contacts cannot be deleted, engagements must reference
//! existing contacts) and keeps a log of every mutating call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::RemoteError;
use crate::ports::{
    ChannelRecord, ContactRecord, ContactsService, IdentityService, NewChannel, NewContact,
    PlanStage, ResponsePlanRecord, ResponsePlanSummary, ResponsePlansService,
};

#[derive(Debug)]
struct StoredContact {
    arn: String,
    alias: String,
    display_name: String,
    plan: Vec<PlanStage>,
}

#[derive(Debug)]
struct StoredChannel {
    contact_arn: String,
    record: ChannelRecord,
}

#[derive(Debug, Default)]
struct State {
    region: String,
    account_id: String,
    contacts: Vec<StoredContact>,
    channels: Vec<StoredChannel>,
    plans: Vec<ResponsePlanRecord>,
    faults: HashMap<(String, String), RemoteError>,
    mutations: Vec<String>,
}

impl State {
    fn contact_arn(&self, alias: &str) -> String {
        format!("arn:aws:ssm-contacts:{}:{}:contact/{alias}", self.region, self.account_id)
    }

    fn check_fault(&self, method: &str, target: &str) -> Result<(), RemoteError> {
        match self.faults.get(&(method.to_string(), target.to_string())) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn contact_index(&self, arn: &str) -> Result<usize, RemoteError> {
        self.contacts
            .iter()
            .position(|c| c.arn == arn)
            .ok_or_else(|| RemoteError::NotFound(format!("contact {arn}")))
    }

    fn plan_index(&self, arn: &str) -> Result<usize, RemoteError> {
        self.plans
            .iter()
            .position(|p| p.arn == arn)
            .ok_or_else(|| RemoteError::NotFound(format!("response plan {arn}")))
    }
}

/// Shared handle to a simulated account.
#[derive(Debug, Clone)]
pub struct InMemoryIncidentManager {
    state: Arc<Mutex<State>>,
}

impl InMemoryIncidentManager {
    /// Creates an empty account in the given region.
    pub fn new(region: impl Into<String>, account_id: impl Into<String>) -> Self {
        let state =
            State { region: region.into(), account_id: account_id.into(), ..State::default() };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory state lock poisoned")
    }

    /// Adds a response plan with the given name and returns its ARN.
    pub fn insert_response_plan(&self, name: &str, incident_title: &str, impact: i32) -> String {
        let mut state = self.lock();
        let arn = format!("arn:aws:ssm-incidents::{}:response-plan/{name}", state.account_id);
        state.plans.push(ResponsePlanRecord {
            arn: arn.clone(),
            name: name.to_string(),
            display_name: Some(name.to_string()),
            engagements: Vec::new(),
            incident_title: Some(incident_title.to_string()),
            impact: Some(impact),
        });
        arn
    }

    /// Makes every call of `method` on `target` fail with `error`.
    ///
    /// `target` is the alias for `create_contact`, the channel name for
    /// `create_contact_channel`, an empty string for `account_id` and
    /// `list_response_plans`, and the ARN argument for every other method.
    pub fn fail(&self, method: &str, target: &str, error: RemoteError) {
        self.lock().faults.insert((method.to_string(), target.to_string()), error);
    }

    /// Every mutating call issued so far, as `"<method> <target>"`.
    #[must_use]
    pub fn mutations(&self) -> Vec<String> {
        self.lock().mutations.clone()
    }

    /// Looks up a contact by alias.
    #[must_use]
    pub fn contact(&self, alias: &str) -> Option<ContactRecord> {
        let state = self.lock();
        state.contacts.iter().find(|c| c.alias == alias).map(|c| ContactRecord {
            arn: c.arn.clone(),
            alias: c.alias.clone(),
            display_name: Some(c.display_name.clone()),
            plan: c.plan.clone(),
        })
    }

    /// Lists the channels of a contact by alias, in creation order.
    #[must_use]
    pub fn channels_of(&self, alias: &str) -> Vec<ChannelRecord> {
        let state = self.lock();
        let arn = state.contact_arn(alias);
        state
            .channels
            .iter()
            .filter(|c| c.contact_arn == arn)
            .map(|c| c.record.clone())
            .collect()
    }

    /// Looks up a response plan by name.
    #[must_use]
    pub fn response_plan(&self, name: &str) -> Option<ResponsePlanRecord> {
        self.lock().plans.iter().find(|p| p.name == name).cloned()
    }

    /// Number of contacts in the account.
    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.lock().contacts.len()
    }

    /// Number of channels in the account.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.lock().channels.len()
    }
}

impl ContactsService for InMemoryIncidentManager {
    fn create_contact(&self, contact: &NewContact) -> Result<String, RemoteError> {
        let mut state = self.lock();
        state.mutations.push(format!("create_contact {}", contact.alias));
        state.check_fault("create_contact", &contact.alias)?;

        let arn = state.contact_arn(&contact.alias);
        if state.contacts.iter().any(|c| c.alias == contact.alias) {
            return Err(RemoteError::Conflict(format!("contact {} already exists", contact.alias)));
        }
        state.contacts.push(StoredContact {
            arn: arn.clone(),
            alias: contact.alias.clone(),
            display_name: contact.display_name.clone(),
            plan: Vec::new(),
        });
        Ok(arn)
    }

    fn get_contact(&self, contact_arn: &str) -> Result<ContactRecord, RemoteError> {
        let state = self.lock();
        state.check_fault("get_contact", contact_arn)?;
        let contact = &state.contacts[state.contact_index(contact_arn)?];
        Ok(ContactRecord {
            arn: contact.arn.clone(),
            alias: contact.alias.clone(),
            display_name: Some(contact.display_name.clone()),
            plan: contact.plan.clone(),
        })
    }

    fn update_contact_plan(
        &self,
        contact_arn: &str,
        stages: &[PlanStage],
    ) -> Result<(), RemoteError> {
        let mut state = self.lock();
        state.mutations.push(format!("update_contact_plan {contact_arn}"));
        state.check_fault("update_contact_plan", contact_arn)?;

        let index = state.contact_index(contact_arn)?;
        for target in stages.iter().flat_map(|s| &s.targets) {
            let owned = state
                .channels
                .iter()
                .any(|c| c.record.arn == target.channel_arn && c.contact_arn == contact_arn);
            if !owned {
                return Err(RemoteError::service(
                    "ValidationException",
                    format!("channel {} does not belong to {contact_arn}", target.channel_arn),
                ));
            }
        }
        state.contacts[index].plan = stages.to_vec();
        Ok(())
    }

    fn create_contact_channel(&self, channel: &NewChannel) -> Result<String, RemoteError> {
        let mut state = self.lock();
        state.mutations.push(format!("create_contact_channel {}", channel.name));
        state.check_fault("create_contact_channel", &channel.name)?;

        let index = state.contact_index(&channel.contact_arn)?;
        let exists = state
            .channels
            .iter()
            .any(|c| c.contact_arn == channel.contact_arn && c.record.name == channel.name);
        if exists {
            return Err(RemoteError::Conflict(format!("channel {} already exists", channel.name)));
        }

        let alias = state.contacts[index].alias.clone();
        let arn = format!(
            "arn:aws:ssm-contacts:{}:{}:contact-channel/{alias}/{}",
            state.region,
            state.account_id,
            uuid::Uuid::new_v4()
        );
        state.channels.push(StoredChannel {
            contact_arn: channel.contact_arn.clone(),
            record: ChannelRecord {
                arn: arn.clone(),
                name: channel.name.clone(),
                channel_type: channel.channel_type,
                address: Some(channel.address.clone()),
            },
        });
        Ok(arn)
    }

    fn list_contact_channels(&self, contact_arn: &str) -> Result<Vec<ChannelRecord>, RemoteError> {
        let state = self.lock();
        state.check_fault("list_contact_channels", contact_arn)?;
        state.contact_index(contact_arn)?;
        Ok(state
            .channels
            .iter()
            .filter(|c| c.contact_arn == contact_arn)
            .map(|c| c.record.clone())
            .collect())
    }

    fn delete_contact_channel(&self, channel_arn: &str) -> Result<(), RemoteError> {
        let mut state = self.lock();
        state.mutations.push(format!("delete_contact_channel {channel_arn}"));
        state.check_fault("delete_contact_channel", channel_arn)?;

        let index = state
            .channels
            .iter()
            .position(|c| c.record.arn == channel_arn)
            .ok_or_else(|| RemoteError::NotFound(format!("channel {channel_arn}")))?;
        let removed = state.channels.remove(index);
        for contact in &mut state.contacts {
            for stage in &mut contact.plan {
                stage.targets.retain(|t| t.channel_arn != removed.record.arn);
            }
        }
        Ok(())
    }

    fn delete_contact(&self, contact_arn: &str) -> Result<(), RemoteError> {
        let mut state = self.lock();
        state.mutations.push(format!("delete_contact {contact_arn}"));
        state.check_fault("delete_contact", contact_arn)?;

        let index = state.contact_index(contact_arn)?;
        let engaged_by =
            state.plans.iter().find(|p| p.engagements.iter().any(|e| e == contact_arn));
        if let Some(plan) = engaged_by {
            return Err(RemoteError::service(
                "ValidationException",
                format!("contact {contact_arn} is engaged by response plan {}", plan.name),
            ));
        }
        state.contacts.remove(index);
        state.channels.retain(|c| c.contact_arn != contact_arn);
        Ok(())
    }
}

impl ResponsePlansService for InMemoryIncidentManager {
    fn get_response_plan(&self, plan_arn: &str) -> Result<ResponsePlanRecord, RemoteError> {
        let state = self.lock();
        state.check_fault("get_response_plan", plan_arn)?;
        Ok(state.plans[state.plan_index(plan_arn)?].clone())
    }

    fn update_response_plan_engagements(
        &self,
        plan_arn: &str,
        engagements: &[String],
    ) -> Result<(), RemoteError> {
        let mut state = self.lock();
        state.mutations.push(format!("update_response_plan {plan_arn}"));
        state.check_fault("update_response_plan", plan_arn)?;

        let index = state.plan_index(plan_arn)?;
        if let Some(unknown) =
            engagements.iter().find(|e| state.contacts.iter().all(|c| &c.arn != *e))
        {
            return Err(RemoteError::service(
                "ValidationException",
                format!("engagement {unknown} is not a contact"),
            ));
        }
        state.plans[index].engagements = engagements.to_vec();
        Ok(())
    }

    fn list_response_plans(&self) -> Result<Vec<ResponsePlanSummary>, RemoteError> {
        let state = self.lock();
        state.check_fault("list_response_plans", "")?;
        Ok(state
            .plans
            .iter()
            .map(|p| ResponsePlanSummary { arn: p.arn.clone(), name: p.name.clone() })
            .collect())
    }
}

impl IdentityService for InMemoryIncidentManager {
    fn account_id(&self) -> Result<String, RemoteError> {
        let state = self.lock();
        state.check_fault("account_id", "")?;
        Ok(state.account_id.clone())
    }
}
