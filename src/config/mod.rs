//! Declarative desired-state configuration.
//!
//! The whole run is driven by one YAML file:
//!
//! ```text
//! region: ap-southeast-1
//! engagement: { escalation_minutes: 1, retry_interval_minutes: 2 }
//! contacts:        [ { alias, name, channels: [ { type, address } ] } ]
//! response_plans:  [ { name, contacts: [alias, ...] } ]
//! deletion:        { contacts: [alias, ...], dry_run, require_confirmation,
//!                    remove_from_response_plans }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ports::ChannelType;

/// Region used when neither the file nor the environment names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Upper bound the service accepts for stage durations and retry intervals.
const MAX_ENGAGEMENT_MINUTES: u32 = 30;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OncallConfig {
    /// Region to operate in.
    #[serde(default)]
    pub region: Option<String>,
    /// Engagement timing shared by every contact.
    #[serde(default)]
    pub engagement: EngagementSettings,
    /// Contacts to converge, in processing order.
    #[serde(default)]
    pub contacts: Vec<ContactSpec>,
    /// Response plans whose engagement lists are rewritten, in processing order.
    #[serde(default)]
    pub response_plans: Vec<ResponsePlanSpec>,
    /// Settings for the `delete` command.
    #[serde(default)]
    pub deletion: DeletionConfig,
}

/// A declared contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactSpec {
    /// Stable key; becomes the remote alias.
    pub alias: String,
    /// Display name.
    pub name: String,
    /// Channels in engagement order.
    pub channels: Vec<ChannelSpec>,
}

/// A declared notification channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelSpec {
    /// Notification method.
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    /// Delivery address.
    pub address: String,
}

impl ContactSpec {
    /// Remote name of one of this contact's channels, derived from alias and type.
    #[must_use]
    pub fn channel_name(&self, channel_type: ChannelType) -> String {
        format!("{}-{}", self.alias, channel_type.as_str().to_ascii_lowercase())
    }
}

/// A declared response plan update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponsePlanSpec {
    /// Response plan name.
    pub name: String,
    /// Aliases to engage, in order.
    pub contacts: Vec<String>,
}

/// Engagement timing for generated contact plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct EngagementSettings {
    /// Minutes each non-final stage waits before escalating.
    pub escalation_minutes: u32,
    /// Minutes between delivery retries within a stage.
    pub retry_interval_minutes: u32,
}

impl Default for EngagementSettings {
    fn default() -> Self {
        Self { escalation_minutes: 1, retry_interval_minutes: 2 }
    }
}

/// Settings for the deletion workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DeletionConfig {
    /// Aliases to delete.
    pub contacts: Vec<String>,
    /// Discover and report only.
    pub dry_run: bool,
    /// Ask for an explicit confirmation before a live deletion.
    pub require_confirmation: bool,
    /// Detach the contact from every response plan before deleting it.
    pub remove_from_response_plans: bool,
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self {
            contacts: Vec::new(),
            dry_run: false,
            require_confirmation: true,
            remove_from_response_plans: true,
        }
    }
}

impl OncallConfig {
    /// Loads and parses a config file without validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
        Self::from_yaml(&content)
            .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
    }

    /// Parses a config from YAML text.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the text does not match the schema.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Resolves the region: file, then `AWS_REGION`, then
    /// `AWS_DEFAULT_REGION`, then [`DEFAULT_REGION`].
    #[must_use]
    pub fn region(&self) -> String {
        resolve_region([
            self.region.clone(),
            std::env::var("AWS_REGION").ok(),
            std::env::var("AWS_DEFAULT_REGION").ok(),
        ])
    }

    /// Checks the desired state for every problem at once.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] listing each problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        let engagement = &self.engagement;
        if engagement.escalation_minutes > MAX_ENGAGEMENT_MINUTES {
            problems.push(format!(
                "engagement.escalation_minutes must be at most {MAX_ENGAGEMENT_MINUTES}"
            ));
        }
        if engagement.retry_interval_minutes > MAX_ENGAGEMENT_MINUTES {
            problems.push(format!(
                "engagement.retry_interval_minutes must be at most {MAX_ENGAGEMENT_MINUTES}"
            ));
        }

        let mut aliases = HashSet::new();
        for contact in &self.contacts {
            validate_contact(contact, &mut aliases, &mut problems);
        }

        let mut plan_names = HashSet::new();
        for plan in &self.response_plans {
            if plan.name.trim().is_empty() {
                problems.push("response plan with empty name".to_string());
                continue;
            }
            if !plan_names.insert(plan.name.as_str()) {
                problems.push(format!("response plan {} is declared twice", plan.name));
            }
            if plan.contacts.is_empty() {
                problems.push(format!("response plan {} has no contacts to engage", plan.name));
            }
            for alias in &plan.contacts {
                if !aliases.contains(alias.as_str()) {
                    problems.push(format!(
                        "response plan {} references undefined contact {alias}",
                        plan.name
                    ));
                }
            }
        }

        if self.deletion.contacts.iter().any(|a| a.trim().is_empty()) {
            problems.push("deletion.contacts contains an empty alias".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}

/// First non-blank candidate, or [`DEFAULT_REGION`].
fn resolve_region(candidates: impl IntoIterator<Item = Option<String>>) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|r| !r.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REGION.to_string())
}

fn validate_contact<'a>(
    contact: &'a ContactSpec,
    aliases: &mut HashSet<&'a str>,
    problems: &mut Vec<String>,
) {
    let alias = contact.alias.as_str();
    if alias.trim().is_empty() {
        problems.push("contact with empty alias".to_string());
        return;
    }
    if !alias.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        problems.push(format!("contact alias {alias} may only contain letters, digits, - and _"));
    }
    if !aliases.insert(alias) {
        problems.push(format!("contact {alias} is declared twice"));
    }
    if contact.name.trim().is_empty() {
        problems.push(format!("contact {alias} is missing a name"));
    }
    if contact.channels.is_empty() {
        problems.push(format!("contact {alias} has no channels"));
    }

    let mut types = HashSet::new();
    for channel in &contact.channels {
        if channel.address.trim().is_empty() {
            problems.push(format!(
                "contact {alias} has a {} channel without address",
                channel.channel_type
            ));
        }
        if !types.insert(channel.channel_type) {
            problems.push(format!(
                "contact {alias} declares more than one {} channel",
                channel.channel_type
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
region: ap-southeast-1
contacts:
  - alias: lmhung
    name: L M Hung
    channels:
      - type: EMAIL
        address: lmhung@example.com
      - type: sms
        address: "+84900000001"
  - alias: ntquy
    name: N T Quy
    channels:
      - type: EMAIL
        address: ntquy@example.com
response_plans:
  - name: prod-critical
    contacts: [lmhung, ntquy]
deletion:
  contacts: [olduser]
  dry_run: true
"#;

    #[test]
    fn parses_full_sample() {
        let config = OncallConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.region.as_deref(), Some("ap-southeast-1"));
        assert_eq!(config.contacts.len(), 2);
        assert_eq!(config.contacts[0].channels[1].channel_type, ChannelType::Sms);
        assert_eq!(config.response_plans[0].contacts, vec!["lmhung", "ntquy"]);
        assert!(config.deletion.dry_run);
        // Unset deletion fields keep their defaults.
        assert!(config.deletion.require_confirmation);
        assert!(config.deletion.remove_from_response_plans);
        assert_eq!(config.engagement, EngagementSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_region_wins() {
        let config = OncallConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.region(), "ap-southeast-1");
    }

    #[test]
    fn blank_region_sources_are_skipped() {
        let some = |r: &str| Some(r.to_string());
        assert_eq!(resolve_region([None, some(""), some("eu-west-1")]), "eu-west-1");
        assert_eq!(resolve_region([some("  "), some("us-west-2"), None]), "us-west-2");
        assert_eq!(resolve_region([some("ap-south-1"), some("x"), some("y")]), "ap-south-1");
        assert_eq!(resolve_region([None, some(" "), None]), DEFAULT_REGION);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let yaml = "contacts: []\nresponse_plan: []\n";
        assert!(OncallConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn channel_name_derives_from_alias_and_type() {
        let config = OncallConfig::from_yaml(SAMPLE).unwrap();
        let contact = &config.contacts[0];
        assert_eq!(contact.channel_name(ChannelType::Sms), "lmhung-sms");
        assert_eq!(contact.channel_name(ChannelType::Email), "lmhung-email");
    }

    #[test]
    fn validate_collects_every_problem() {
        let yaml = r#"
contacts:
  - alias: a
    name: ""
    channels: []
  - alias: a
    name: Dup
    channels:
      - { type: EMAIL, address: "" }
      - { type: EMAIL, address: x@example.com }
response_plans:
  - name: p
    contacts: [a, ghost]
  - name: q
    contacts: []
"#;
        let config = OncallConfig::from_yaml(yaml).unwrap();
        let Err(ConfigError::Invalid(problems)) = config.validate() else {
            panic!("expected validation failure");
        };
        let joined = problems.join("\n");
        assert!(joined.contains("contact a is missing a name"));
        assert!(joined.contains("contact a has no channels"));
        assert!(joined.contains("contact a is declared twice"));
        assert!(joined.contains("EMAIL channel without address"));
        assert!(joined.contains("more than one EMAIL channel"));
        assert!(joined.contains("undefined contact ghost"));
        assert!(joined.contains("response plan q has no contacts"));
    }

    #[test]
    fn validate_rejects_out_of_range_engagement() {
        let config = OncallConfig {
            engagement: EngagementSettings { escalation_minutes: 45, retry_interval_minutes: 2 },
            ..OncallConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = OncallConfig::load(Path::new("/nonexistent/oncall.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
