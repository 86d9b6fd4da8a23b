//! Live adapter for the `ContactsService` port (`aws-sdk-ssmcontacts`).

use std::sync::Arc;

use aws_sdk_ssmcontacts::types::{
    self as sdk, ChannelTargetInfo, ContactChannelAddress, ContactType, Plan, Stage, Target,
};
use aws_sdk_ssmcontacts::Client;
use tokio::runtime::Runtime;

use super::{classify, optional};
use crate::error::RemoteError;
use crate::ports::{
    ChannelRecord, ChannelTarget, ChannelType, ContactRecord, ContactsService, NewChannel,
    NewContact, PlanStage,
};

/// Contacts client blocking on a shared runtime.
pub struct LiveContacts {
    client: Client,
    runtime: Arc<Runtime>,
}

impl LiveContacts {
    /// Wraps an SDK client.
    #[must_use]
    pub fn new(client: Client, runtime: Arc<Runtime>) -> Self {
        Self { client, runtime }
    }
}

fn to_sdk_channel(channel_type: ChannelType) -> sdk::ChannelType {
    match channel_type {
        ChannelType::Email => sdk::ChannelType::Email,
        ChannelType::Sms => sdk::ChannelType::Sms,
        ChannelType::Voice => sdk::ChannelType::Voice,
    }
}

fn to_sdk_plan(stages: &[PlanStage]) -> Result<Plan, RemoteError> {
    let invalid = |e: aws_sdk_ssmcontacts::error::BuildError| {
        RemoteError::service("ValidationException", e.to_string())
    };
    let mut built = Vec::with_capacity(stages.len());
    for stage in stages {
        let mut targets = Vec::with_capacity(stage.targets.len());
        for target in &stage.targets {
            let info = ChannelTargetInfo::builder()
                .contact_channel_id(&target.channel_arn)
                .retry_interval_in_minutes(to_i32(target.retry_interval_in_minutes))
                .build()
                .map_err(invalid)?;
            targets.push(Target::builder().channel_target_info(info).build());
        }
        built.push(
            Stage::builder()
                .duration_in_minutes(to_i32(stage.duration_in_minutes))
                .set_targets(Some(targets))
                .build()
                .map_err(invalid)?,
        );
    }
    Ok(Plan::builder().set_stages(Some(built)).build())
}

fn from_sdk_plan(plan: Option<&Plan>) -> Vec<PlanStage> {
    let Some(plan) = plan else {
        return Vec::new();
    };
    plan.stages()
        .iter()
        .map(|stage| PlanStage {
            duration_in_minutes: minutes(optional(stage.duration_in_minutes())),
            targets: stage
                .targets()
                .iter()
                .filter_map(Target::channel_target_info)
                .map(|info| ChannelTarget {
                    channel_arn: info.contact_channel_id().to_string(),
                    retry_interval_in_minutes: minutes(info.retry_interval_in_minutes()),
                })
                .collect(),
        })
        .collect()
}

fn to_i32(minutes: u32) -> i32 {
    i32::try_from(minutes).unwrap_or(i32::MAX)
}

fn minutes(value: Option<i32>) -> u32 {
    value.and_then(|v| u32::try_from(v).ok()).unwrap_or(0)
}

impl ContactsService for LiveContacts {
    fn create_contact(&self, contact: &NewContact) -> Result<String, RemoteError> {
        let output = self
            .runtime
            .block_on(
                self.client
                    .create_contact()
                    .alias(&contact.alias)
                    .display_name(&contact.display_name)
                    .r#type(ContactType::Personal)
                    .plan(Plan::builder().set_stages(Some(Vec::new())).build())
                    .send(),
            )
            .map_err(|e| classify(&e))?;
        Ok(output.contact_arn().to_string())
    }

    fn get_contact(&self, contact_arn: &str) -> Result<ContactRecord, RemoteError> {
        let output = self
            .runtime
            .block_on(self.client.get_contact().contact_id(contact_arn).send())
            .map_err(|e| classify(&e))?;
        Ok(ContactRecord {
            arn: output.contact_arn().to_string(),
            alias: output.alias().to_string(),
            display_name: output.display_name().map(str::to_string),
            plan: from_sdk_plan(optional(output.plan())),
        })
    }

    fn update_contact_plan(
        &self,
        contact_arn: &str,
        stages: &[PlanStage],
    ) -> Result<(), RemoteError> {
        let plan = to_sdk_plan(stages)?;
        self.runtime
            .block_on(self.client.update_contact().contact_id(contact_arn).plan(plan).send())
            .map_err(|e| classify(&e))?;
        Ok(())
    }

    fn create_contact_channel(&self, channel: &NewChannel) -> Result<String, RemoteError> {
        let address = ContactChannelAddress::builder().simple_address(&channel.address).build();
        let output = self
            .runtime
            .block_on(
                self.client
                    .create_contact_channel()
                    .contact_id(&channel.contact_arn)
                    .name(&channel.name)
                    .r#type(to_sdk_channel(channel.channel_type))
                    .delivery_address(address)
                    .send(),
            )
            .map_err(|e| classify(&e))?;
        Ok(output.contact_channel_arn().to_string())
    }

    fn list_contact_channels(&self, contact_arn: &str) -> Result<Vec<ChannelRecord>, RemoteError> {
        let mut channels = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let output = self
                .runtime
                .block_on(
                    self.client
                        .list_contact_channels()
                        .contact_id(contact_arn)
                        .set_next_token(next_token.take())
                        .send(),
                )
                .map_err(|e| classify(&e))?;
            for channel in output.contact_channels() {
                let Some(channel_type) = optional(channel.r#type())
                    .and_then(|t: &sdk::ChannelType| ChannelType::parse(t.as_str()))
                else {
                    continue;
                };
                channels.push(ChannelRecord {
                    arn: channel.contact_channel_arn().to_string(),
                    name: channel.name().to_string(),
                    channel_type,
                    address: optional(channel.delivery_address())
                        .and_then(|a: &ContactChannelAddress| a.simple_address())
                        .map(str::to_string),
                });
            }
            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }
        Ok(channels)
    }

    fn delete_contact_channel(&self, channel_arn: &str) -> Result<(), RemoteError> {
        self.runtime
            .block_on(self.client.delete_contact_channel().contact_channel_id(channel_arn).send())
            .map_err(|e| classify(&e))?;
        Ok(())
    }

    fn delete_contact(&self, contact_arn: &str) -> Result<(), RemoteError> {
        self.runtime
            .block_on(self.client.delete_contact().contact_id(contact_arn).send())
            .map_err(|e| classify(&e))?;
        Ok(())
    }
}
