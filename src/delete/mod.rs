//! Contact deletion: discover what references a contact, then detach and
//! remove it in dependency order.
//!
//! A contact cannot be deleted while a response plan engages it, and its
//! channels go before the contact itself. [`plan_deletion`] only reads;
//! [`execute_deletion`] walks [`DeletionPlan::steps`] in order and stops
//! at the first failure.

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::arn::ArnBuilder;
use crate::context::ServiceContext;
use crate::error::RemoteError;
use crate::ports::{ChannelRecord, ResponsePlanSummary};

/// Everything that has to go for one contact to be deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletionPlan {
    /// Contact alias.
    pub alias: String,
    /// Contact ARN.
    pub contact_arn: String,
    /// Display name, if the service reported one.
    pub display_name: Option<String>,
    /// Response plans whose engagement list contains the contact.
    pub plans: Vec<ResponsePlanSummary>,
    /// The contact's channels.
    pub channels: Vec<ChannelRecord>,
}

/// One mutating call of a deletion.
#[derive(Debug, Clone, PartialEq)]
pub enum DeletionStep {
    /// Remove the contact from a response plan's engagement list.
    Disassociate(ResponsePlanSummary),
    /// Delete one of the contact's channels.
    DeleteChannel(ChannelRecord),
    /// Delete the contact.
    DeleteContact(String),
}

impl fmt::Display for DeletionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disassociate(plan) => write!(f, "remove from response plan {}", plan.name),
            Self::DeleteChannel(channel) => {
                write!(f, "delete {} channel {}", channel.channel_type, channel.name)
            }
            Self::DeleteContact(arn) => write!(f, "delete contact {arn}"),
        }
    }
}

impl DeletionPlan {
    /// Steps in the order they must run: disassociations, then channels,
    /// then the contact.
    #[must_use]
    pub fn steps(&self) -> Vec<DeletionStep> {
        self.plans
            .iter()
            .cloned()
            .map(DeletionStep::Disassociate)
            .chain(self.channels.iter().cloned().map(DeletionStep::DeleteChannel))
            .chain(std::iter::once(DeletionStep::DeleteContact(self.contact_arn.clone())))
            .collect()
    }
}

/// What happened to one contact.
#[derive(Debug, Clone, PartialEq)]
pub enum DeletionOutcome {
    /// Every step ran.
    Deleted {
        /// Steps executed.
        steps: usize,
    },
    /// Dry run: these steps would run.
    WouldDelete {
        /// Planned steps, in order.
        steps: Vec<DeletionStep>,
    },
    /// The contact does not exist.
    Absent,
    /// Discovery or a step failed; later steps were not attempted.
    Failed {
        /// Steps that completed before the failure.
        completed: usize,
        /// What failed and why.
        error: String,
    },
}

impl DeletionOutcome {
    /// Returns `true` for [`DeletionOutcome::Failed`].
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Result for one alias of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletionEntry {
    /// Contact alias.
    pub alias: String,
    /// Outcome for that alias.
    pub outcome: DeletionOutcome,
}

/// Everything one `delete` run did.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletionReport {
    /// Whether mutating calls were suppressed.
    pub dry_run: bool,
    /// Region the run targeted.
    pub region: String,
    /// Account the run targeted.
    pub account_id: String,
    /// Per-alias results, in requested order.
    pub entries: Vec<DeletionEntry>,
}

impl DeletionReport {
    /// Number of aliases whose deletion failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_failed()).count()
    }
}

/// Flags for a deletion batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Discover and report only.
    pub dry_run: bool,
    /// Look for and detach engaging response plans first.
    pub remove_from_response_plans: bool,
}

/// Lists every response plan whose engagement list contains `contact_arn`.
///
/// # Errors
///
/// Returns the first failure listing or reading plans.
pub fn find_plans_referencing(
    ctx: &ServiceContext,
    contact_arn: &str,
) -> Result<Vec<ResponsePlanSummary>, RemoteError> {
    let mut referencing = Vec::new();
    for summary in ctx.plans.list_response_plans()? {
        let plan = ctx.plans.get_response_plan(&summary.arn)?;
        if plan.engagements.iter().any(|e| e == contact_arn) {
            referencing.push(summary);
        }
    }
    Ok(referencing)
}

/// Discovers what deleting `alias` involves. Issues reads only.
///
/// Returns `Ok(None)` when the contact does not exist.
///
/// # Errors
///
/// Returns the first failure other than the contact being absent.
pub fn plan_deletion(
    ctx: &ServiceContext,
    arns: &ArnBuilder,
    alias: &str,
    remove_from_response_plans: bool,
) -> Result<Option<DeletionPlan>, RemoteError> {
    let contact = match ctx.contacts.get_contact(&arns.contact(alias)) {
        Ok(contact) => contact,
        Err(err) if err.is_not_found() => return Ok(None),
        Err(err) => return Err(err),
    };

    let channels = ctx.contacts.list_contact_channels(&contact.arn)?;
    if !channels.is_empty() {
        info!("Found {} channel(s) for {alias}", channels.len());
        for channel in &channels {
            debug!("  - {}: {}", channel.channel_type, channel.name);
        }
    }

    let plans = if remove_from_response_plans {
        find_plans_referencing(ctx, &contact.arn)?
    } else {
        Vec::new()
    };
    if !plans.is_empty() {
        info!("Contact {alias} is used in {} response plan(s)", plans.len());
        for plan in &plans {
            debug!("  - {}", plan.name);
        }
    }

    Ok(Some(DeletionPlan {
        alias: alias.to_string(),
        contact_arn: contact.arn,
        display_name: contact.display_name,
        plans,
        channels,
    }))
}

/// Runs a deletion plan. In dry-run mode every step is logged and no
/// mutating call is issued.
#[must_use]
pub fn execute_deletion(
    ctx: &ServiceContext,
    plan: &DeletionPlan,
    dry_run: bool,
) -> DeletionOutcome {
    let steps = plan.steps();
    if dry_run {
        for step in &steps {
            warn!("[DRY RUN] Would {step} ({})", plan.alias);
        }
        return DeletionOutcome::WouldDelete { steps };
    }

    for (completed, step) in steps.iter().enumerate() {
        if let Err(err) = run_step(ctx, &plan.contact_arn, step) {
            error!("Failed to {step} ({}): {err}", plan.alias);
            return DeletionOutcome::Failed { completed, error: format!("{step}: {err}") };
        }
    }
    info!("Deleted contact: {}", plan.alias);
    DeletionOutcome::Deleted { steps: steps.len() }
}

fn run_step(
    ctx: &ServiceContext,
    contact_arn: &str,
    step: &DeletionStep,
) -> Result<(), RemoteError> {
    match step {
        DeletionStep::Disassociate(summary) => disassociate(ctx, summary, contact_arn),
        DeletionStep::DeleteChannel(channel) => {
            ctx.contacts.delete_contact_channel(&channel.arn)?;
            info!("Deleted {} channel: {}", channel.channel_type, channel.name);
            Ok(())
        }
        DeletionStep::DeleteContact(arn) => ctx.contacts.delete_contact(arn),
    }
}

/// Re-reads the plan and writes back its engagements without the contact.
fn disassociate(
    ctx: &ServiceContext,
    summary: &ResponsePlanSummary,
    contact_arn: &str,
) -> Result<(), RemoteError> {
    let current = ctx.plans.get_response_plan(&summary.arn)?;
    let remaining: Vec<String> =
        current.engagements.iter().filter(|e| *e != contact_arn).cloned().collect();
    if remaining.len() == current.engagements.len() {
        warn!("Contact no longer in response plan: {}", summary.name);
        return Ok(());
    }
    ctx.plans.update_response_plan_engagements(&summary.arn, &remaining)?;
    info!("Removed contact from response plan: {}", summary.name);
    Ok(())
}

/// Deletes each alias in turn. One alias failing does not stop the others.
///
/// # Errors
///
/// Returns an error only when the caller's account cannot be resolved.
pub fn delete_contacts(
    ctx: &ServiceContext,
    region: &str,
    aliases: &[String],
    options: DeleteOptions,
) -> Result<DeletionReport, RemoteError> {
    let account_id = ctx.identity.account_id()?;
    let arns = ArnBuilder::new(region, &account_id);

    let mut entries = Vec::with_capacity(aliases.len());
    for alias in aliases {
        info!("Processing contact: {alias}");
        let outcome = match plan_deletion(ctx, &arns, alias, options.remove_from_response_plans) {
            Ok(Some(plan)) => execute_deletion(ctx, &plan, options.dry_run),
            Ok(None) => {
                warn!("Contact not found: {alias}");
                DeletionOutcome::Absent
            }
            Err(err) => {
                error!("Failed to inspect contact {alias}: {err}");
                DeletionOutcome::Failed { completed: 0, error: format!("discovery: {err}") }
            }
        };
        entries.push(DeletionEntry { alias: alias.clone(), outcome });
    }

    Ok(DeletionReport { dry_run: options.dry_run, region: region.to_string(), account_id, entries })
}
