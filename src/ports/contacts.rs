//! Contacts port: on-call contacts, their channels, and engagement plans.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RemoteError;

/// Notification method of a contact channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChannelType {
    /// E-mail delivery.
    #[serde(alias = "email")]
    Email,
    /// Text message delivery.
    #[serde(alias = "sms")]
    Sms,
    /// Voice call delivery.
    #[serde(alias = "voice")]
    Voice,
}

impl ChannelType {
    /// Wire name used by the service (`EMAIL`, `SMS`, `VOICE`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Sms => "SMS",
            Self::Voice => "VOICE",
        }
    }

    /// Parses the service wire name, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "EMAIL" => Some(Self::Email),
            "SMS" => Some(Self::Sms),
            "VOICE" => Some(Self::Voice),
            _ => None,
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to create a personal contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContact {
    /// Unique alias, immutable once created.
    pub alias: String,
    /// Display name.
    pub display_name: String,
}

/// A contact as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Contact ARN.
    pub arn: String,
    /// Contact alias.
    pub alias: String,
    /// Display name, if set.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Current engagement plan.
    #[serde(default)]
    pub plan: Vec<PlanStage>,
}

/// One stage of a contact's engagement plan as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStage {
    /// Minutes to wait before moving to the next stage.
    pub duration_in_minutes: u32,
    /// Channels engaged during this stage.
    pub targets: Vec<ChannelTarget>,
}

/// A channel engaged by a plan stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTarget {
    /// ARN of the contact channel.
    pub channel_arn: String,
    /// Minutes between delivery retries on this channel.
    pub retry_interval_in_minutes: u32,
}

/// Request to create a channel under a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChannel {
    /// ARN of the owning contact.
    pub contact_arn: String,
    /// Channel name, unique within the contact.
    pub name: String,
    /// Notification method.
    pub channel_type: ChannelType,
    /// Delivery address (e-mail address or E.164 phone number).
    pub address: String,
}

/// A contact channel as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    /// Channel ARN.
    pub arn: String,
    /// Channel name.
    pub name: String,
    /// Notification method.
    pub channel_type: ChannelType,
    /// Delivery address, if reported.
    #[serde(default)]
    pub address: Option<String>,
}

/// Manages contacts and their channels.
pub trait ContactsService: Send + Sync {
    /// Creates a contact with an empty engagement plan and returns its ARN.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Conflict`] when the alias is already taken.
    fn create_contact(&self, contact: &NewContact) -> Result<String, RemoteError>;

    /// Fetches a contact by ARN.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] when no such contact exists.
    fn get_contact(&self, contact_arn: &str) -> Result<ContactRecord, RemoteError>;

    /// Replaces the contact's engagement plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the contact is missing or the plan is rejected.
    fn update_contact_plan(&self, contact_arn: &str, stages: &[PlanStage])
        -> Result<(), RemoteError>;

    /// Creates a channel and returns its ARN.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Conflict`] when the channel already exists.
    fn create_contact_channel(&self, channel: &NewChannel) -> Result<String, RemoteError>;

    /// Lists every channel of a contact.
    ///
    /// # Errors
    ///
    /// Returns an error if the contact is missing or the call fails.
    fn list_contact_channels(&self, contact_arn: &str) -> Result<Vec<ChannelRecord>, RemoteError>;

    /// Deletes a channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is missing or the call fails.
    fn delete_contact_channel(&self, channel_arn: &str) -> Result<(), RemoteError>;

    /// Deletes a contact.
    ///
    /// # Errors
    ///
    /// Returns an error if the contact is missing, still referenced, or the
    /// call fails.
    fn delete_contact(&self, contact_arn: &str) -> Result<(), RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_type_accepts_both_cases() {
        let upper: ChannelType = serde_yaml::from_str("SMS").unwrap();
        let lower: ChannelType = serde_yaml::from_str("sms").unwrap();
        assert_eq!(upper, ChannelType::Sms);
        assert_eq!(lower, ChannelType::Sms);
        assert!(serde_yaml::from_str::<ChannelType>("PAGER").is_err());
    }

    #[test]
    fn channel_type_parse_matches_wire_names() {
        assert_eq!(ChannelType::parse("voice"), Some(ChannelType::Voice));
        assert_eq!(ChannelType::parse("EMAIL"), Some(ChannelType::Email));
        assert_eq!(ChannelType::parse("fax"), None);
        assert_eq!(ChannelType::Email.to_string(), "EMAIL");
    }
}
