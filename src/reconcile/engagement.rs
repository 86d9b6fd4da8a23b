//! Engagement plan derived from a contact's channel order.
//!
//! Channel *i* becomes stage *i*. Every stage but the last waits
//! `escalation_minutes` before escalating; the last waits zero.

use std::collections::HashMap;

use crate::config::{ChannelSpec, EngagementSettings};
use crate::ports::{ChannelTarget, ChannelType, PlanStage};

/// One step of a contact's notification sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementStage {
    /// Channel engaged in this stage.
    pub channel_type: ChannelType,
    /// Minutes before escalating to the next stage.
    pub wait_minutes: u32,
    /// Minutes between delivery retries.
    pub retry_interval_minutes: u32,
}

/// Builds the ordered stages for a channel list.
#[must_use]
pub fn engagement_plan(
    channels: &[ChannelSpec],
    settings: &EngagementSettings,
) -> Vec<EngagementStage> {
    let last = channels.len().saturating_sub(1);
    channels
        .iter()
        .enumerate()
        .map(|(i, channel)| EngagementStage {
            channel_type: channel.channel_type,
            wait_minutes: if i < last { settings.escalation_minutes } else { 0 },
            retry_interval_minutes: settings.retry_interval_minutes,
        })
        .collect()
}

/// Binds stages to channel ARNs, dropping stages whose channel is unresolved.
///
/// The last bound stage always waits zero, even when the declared last
/// channel was dropped.
#[must_use]
pub fn bind_stages(
    stages: &[EngagementStage],
    channel_arns: &HashMap<ChannelType, String>,
) -> Vec<PlanStage> {
    let mut bound: Vec<PlanStage> = stages
        .iter()
        .filter_map(|stage| {
            channel_arns.get(&stage.channel_type).map(|arn| PlanStage {
                duration_in_minutes: stage.wait_minutes,
                targets: vec![ChannelTarget {
                    channel_arn: arn.clone(),
                    retry_interval_in_minutes: stage.retry_interval_minutes,
                }],
            })
        })
        .collect();
    if let Some(last) = bound.last_mut() {
        last.duration_in_minutes = 0;
    }
    bound
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels(types: &[ChannelType]) -> Vec<ChannelSpec> {
        types
            .iter()
            .map(|t| ChannelSpec { channel_type: *t, address: "x".into() })
            .collect()
    }

    #[test]
    fn all_but_last_wait_one_interval() {
        let settings = EngagementSettings::default();
        let plan = engagement_plan(
            &channels(&[ChannelType::Email, ChannelType::Sms, ChannelType::Voice]),
            &settings,
        );
        let waits: Vec<u32> = plan.iter().map(|s| s.wait_minutes).collect();
        assert_eq!(waits, vec![1, 1, 0]);
        assert!(plan.iter().all(|s| s.retry_interval_minutes == 2));
        assert_eq!(plan[2].channel_type, ChannelType::Voice);
    }

    #[test]
    fn single_channel_is_terminal() {
        let plan = engagement_plan(&channels(&[ChannelType::Sms]), &EngagementSettings::default());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].wait_minutes, 0);
    }

    #[test]
    fn empty_channel_list_yields_no_stages() {
        assert!(engagement_plan(&[], &EngagementSettings::default()).is_empty());
    }

    #[test]
    fn custom_settings_are_applied() {
        let settings = EngagementSettings { escalation_minutes: 5, retry_interval_minutes: 3 };
        let plan = engagement_plan(&channels(&[ChannelType::Email, ChannelType::Sms]), &settings);
        assert_eq!(plan[0].wait_minutes, 5);
        assert_eq!(plan[0].retry_interval_minutes, 3);
        assert_eq!(plan[1].wait_minutes, 0);
    }

    #[test]
    fn binding_skips_unresolved_channels_and_keeps_last_terminal() {
        let plan = engagement_plan(
            &channels(&[ChannelType::Email, ChannelType::Sms, ChannelType::Voice]),
            &EngagementSettings::default(),
        );
        let arns = HashMap::from([
            (ChannelType::Email, "arn:email".to_string()),
            (ChannelType::Sms, "arn:sms".to_string()),
        ]);
        let bound = bind_stages(&plan, &arns);
        assert_eq!(bound.len(), 2);
        assert_eq!(bound[0].targets[0].channel_arn, "arn:email");
        assert_eq!(bound[0].duration_in_minutes, 1);
        assert_eq!(bound[1].targets[0].channel_arn, "arn:sms");
        assert_eq!(bound[1].duration_in_minutes, 0);
    }
}
