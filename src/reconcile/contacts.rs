//! Contact reconciler: makes one declared contact and its channels exist.

use std::collections::HashMap;

use tracing::{debug, error, info, warn};

use super::engagement::{bind_stages, engagement_plan};
use super::outcome::{CreateOutcome, ResourceStatus};
use crate::arn::ArnBuilder;
use crate::config::{ContactSpec, EngagementSettings};
use crate::context::ServiceContext;
use crate::error::RemoteError;
use crate::ports::{ChannelRecord, ChannelType, NewChannel, NewContact, PlanStage};

/// What happened to a contact's engagement plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanWrite {
    /// The plan was written.
    Written,
    /// The remote plan already matched.
    Unchanged,
    /// A live run would write the plan.
    WouldWrite,
    /// The write was rejected; the contact itself is still usable.
    Failed(String),
}

/// Outcome of reconciling one contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactResolution {
    /// Contact alias.
    pub alias: String,
    /// Resolved contact ARN.
    pub arn: String,
    /// What happened to the contact itself.
    pub contact: ResourceStatus,
    /// What happened to each declared channel, in declared order.
    pub channels: Vec<(ChannelType, ResourceStatus)>,
    /// Number of stages in the engagement plan.
    pub stages: usize,
    /// What happened to the engagement plan.
    pub plan: PlanWrite,
}

/// Reconciles one contact against the service.
///
/// Creation conflicts are success: the contact ARN then comes from a
/// lookup. Channels of an existing contact are listed first and reused by
/// derived name, then by type, so a channel created under another name is
/// not duplicated. In dry-run mode only reads are issued.
///
/// # Errors
///
/// Returns the first unexpected remote failure; the caller decides whether
/// to continue with the next contact.
pub fn reconcile_contact(
    ctx: &ServiceContext,
    arns: &ArnBuilder,
    contact: &ContactSpec,
    settings: &EngagementSettings,
    dry_run: bool,
) -> Result<ContactResolution, RemoteError> {
    if dry_run {
        return preview_contact(ctx, arns, contact, settings);
    }

    let alias = contact.alias.as_str();
    let request =
        NewContact { alias: contact.alias.clone(), display_name: contact.name.clone() };

    let (arn, contact_status, current_plan) =
        match CreateOutcome::from(ctx.contacts.create_contact(&request)) {
            CreateOutcome::Created(arn) => {
                info!("Created contact {alias}");
                (arn, ResourceStatus::Created, None)
            }
            CreateOutcome::AlreadyExists => {
                let existing = ctx.contacts.get_contact(&arns.contact(alias))?;
                info!("Contact already exists: {alias}");
                (existing.arn, ResourceStatus::AlreadyExists, Some(existing.plan))
            }
            CreateOutcome::Failed(err) => {
                error!("Error creating contact {alias}: {err}");
                return Err(err);
            }
        };

    // An existing contact may already carry channels under other names.
    let mut listed = if current_plan.is_some() {
        Some(ctx.contacts.list_contact_channels(&arn)?)
    } else {
        None
    };
    let mut channel_arns: HashMap<ChannelType, String> = HashMap::new();
    let mut channel_statuses = Vec::with_capacity(contact.channels.len());

    for channel in &contact.channels {
        let channel_type = channel.channel_type;
        let name = contact.channel_name(channel_type);

        let found = listed.as_deref().and_then(|l| find_channel(l, &name, channel_type));
        if let Some(existing) = found {
            debug!("{channel_type} channel already exists for {alias}: {}", existing.name);
            channel_arns.insert(channel_type, existing.arn.clone());
            channel_statuses.push((channel_type, ResourceStatus::AlreadyExists));
            continue;
        }

        let request = NewChannel {
            contact_arn: arn.clone(),
            name: name.clone(),
            channel_type,
            address: channel.address.clone(),
        };
        match CreateOutcome::from(ctx.contacts.create_contact_channel(&request)) {
            CreateOutcome::Created(channel_arn) => {
                info!("Created {channel_type} channel for {alias}");
                channel_arns.insert(channel_type, channel_arn);
                channel_statuses.push((channel_type, ResourceStatus::Created));
            }
            CreateOutcome::AlreadyExists => {
                info!("{channel_type} channel already exists for {alias}");
                let refreshed = ctx.contacts.list_contact_channels(&arn)?;
                match find_channel(&refreshed, &name, channel_type) {
                    Some(existing) => {
                        channel_arns.insert(channel_type, existing.arn.clone());
                    }
                    None => warn!("Could not find existing {channel_type} channel for {alias}"),
                }
                listed = Some(refreshed);
                channel_statuses.push((channel_type, ResourceStatus::AlreadyExists));
            }
            CreateOutcome::Failed(err) => {
                error!("Error creating {channel_type} channel for {alias}: {err}");
                return Err(err);
            }
        }
    }

    let stages = bind_stages(&engagement_plan(&contact.channels, settings), &channel_arns);
    log_stages(alias, &stages);

    let plan = if current_plan.as_deref() == Some(stages.as_slice()) {
        debug!("Engagement plan for {alias} is unchanged");
        PlanWrite::Unchanged
    } else {
        match ctx.contacts.update_contact_plan(&arn, &stages) {
            Ok(()) => {
                info!("Updated contact plan for {alias} with {} stage(s)", stages.len());
                PlanWrite::Written
            }
            Err(err) => {
                warn!("Could not update contact plan for {alias}: {err}");
                PlanWrite::Failed(err.to_string())
            }
        }
    };

    Ok(ContactResolution {
        alias: contact.alias.clone(),
        arn,
        contact: contact_status,
        channels: channel_statuses,
        stages: stages.len(),
        plan,
    })
}

/// Read-only variant of [`reconcile_contact`].
fn preview_contact(
    ctx: &ServiceContext,
    arns: &ArnBuilder,
    contact: &ContactSpec,
    settings: &EngagementSettings,
) -> Result<ContactResolution, RemoteError> {
    let alias = contact.alias.as_str();
    let stages = engagement_plan(&contact.channels, settings);

    let existing = match ctx.contacts.get_contact(&arns.contact(alias)) {
        Ok(existing) => Some(existing),
        Err(err) if err.is_not_found() => None,
        Err(err) => return Err(err),
    };

    let Some(existing) = existing else {
        warn!("[DRY RUN] Would create contact {alias} with {} channel(s)", contact.channels.len());
        return Ok(ContactResolution {
            alias: contact.alias.clone(),
            arn: arns.contact(alias),
            contact: ResourceStatus::WouldCreate,
            channels: contact
                .channels
                .iter()
                .map(|c| (c.channel_type, ResourceStatus::WouldCreate))
                .collect(),
            stages: stages.len(),
            plan: PlanWrite::WouldWrite,
        });
    };

    let listed = ctx.contacts.list_contact_channels(&existing.arn)?;
    let mut channel_arns = HashMap::new();
    let mut channel_statuses = Vec::with_capacity(contact.channels.len());
    for channel in &contact.channels {
        let channel_type = channel.channel_type;
        match find_channel(&listed, &contact.channel_name(channel_type), channel_type) {
            Some(found) => {
                channel_arns.insert(channel_type, found.arn.clone());
                channel_statuses.push((channel_type, ResourceStatus::AlreadyExists));
            }
            None => {
                warn!("[DRY RUN] Would create {channel_type} channel for {alias}");
                channel_statuses.push((channel_type, ResourceStatus::WouldCreate));
            }
        }
    }

    let all_present = channel_arns.len() == contact.channels.len();
    let bound = bind_stages(&stages, &channel_arns);
    let plan = if all_present && bound == existing.plan {
        PlanWrite::Unchanged
    } else {
        warn!("[DRY RUN] Would update contact plan for {alias}");
        PlanWrite::WouldWrite
    };

    Ok(ContactResolution {
        alias: contact.alias.clone(),
        arn: existing.arn,
        contact: ResourceStatus::AlreadyExists,
        channels: channel_statuses,
        stages: stages.len(),
        plan,
    })
}

/// Finds a channel by its derived name, falling back to its type.
fn find_channel<'a>(
    channels: &'a [ChannelRecord],
    name: &str,
    channel_type: ChannelType,
) -> Option<&'a ChannelRecord> {
    channels
        .iter()
        .find(|c| c.name == name)
        .or_else(|| channels.iter().find(|c| c.channel_type == channel_type))
}

fn log_stages(alias: &str, stages: &[PlanStage]) {
    for (i, stage) in stages.iter().enumerate() {
        debug!(
            "{alias} stage {}: {} target(s), waits {} min",
            i + 1,
            stage.targets.len(),
            stage.duration_in_minutes
        );
    }
}
