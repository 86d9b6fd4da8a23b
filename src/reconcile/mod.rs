//! Convergence of declared contacts and response plans.
//!
//! `apply` reconciles every contact first, collecting an alias → ARN map,
//! then rewrites every declared response plan from that map. Items are
//! isolated: one failing contact or plan is logged and recorded in the
//! report, and the batch moves on. Nothing is rolled back.

pub mod contacts;
pub mod engagement;
pub mod outcome;
pub mod plans;

use std::collections::HashMap;

use tracing::{error, info};

use crate::arn::ArnBuilder;
use crate::config::OncallConfig;
use crate::context::ServiceContext;
use crate::error::RemoteError;

pub use contacts::{reconcile_contact, ContactResolution, PlanWrite};
pub use engagement::{engagement_plan, EngagementStage};
pub use outcome::{CreateOutcome, ResourceStatus};
pub use plans::{update_response_plan, PlanOutcome};

/// Alias → contact ARN, built during one run.
pub type AliasMap = HashMap<String, String>;

/// Result of reconciling one contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactReport {
    /// Contact alias.
    pub alias: String,
    /// Resolution, or the failure message.
    pub result: Result<ContactResolution, String>,
}

/// Result of updating one response plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanReport {
    /// Response plan name.
    pub name: String,
    /// Outcome, or the failure message.
    pub result: Result<PlanOutcome, String>,
}

/// Everything one `apply` run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Whether mutating calls were suppressed.
    pub dry_run: bool,
    /// Region the run targeted.
    pub region: String,
    /// Account the run targeted.
    pub account_id: String,
    /// Per-contact results, in declared order.
    pub contacts: Vec<ContactReport>,
    /// Per-plan results, in declared order.
    pub plans: Vec<PlanReport>,
}

impl ApplyReport {
    /// Number of contacts and plans that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.contacts.iter().filter(|c| c.result.is_err()).count()
            + self.plans.iter().filter(|p| p.result.is_err()).count()
    }

    /// The alias map the plans were updated from.
    #[must_use]
    pub fn resolved(&self) -> AliasMap {
        self.contacts
            .iter()
            .filter_map(|c| c.result.as_ref().ok().map(|r| (c.alias.clone(), r.arn.clone())))
            .collect()
    }
}

/// Converges all declared contacts, then all declared response plans.
///
/// # Errors
///
/// Returns an error only when the caller's account cannot be resolved;
/// per-item failures are recorded in the report instead.
pub fn apply(
    ctx: &ServiceContext,
    config: &OncallConfig,
    dry_run: bool,
) -> Result<ApplyReport, RemoteError> {
    let account_id = ctx.identity.account_id()?;
    let region = config.region();
    let arns = ArnBuilder::new(&region, &account_id);

    info!("--- [1/2] Processing {} contact definition(s) ---", config.contacts.len());
    let mut resolved = AliasMap::new();
    let mut contact_reports = Vec::with_capacity(config.contacts.len());
    for contact in &config.contacts {
        let result =
            reconcile_contact(ctx, &arns, contact, &config.engagement, dry_run).map_err(|err| {
                error!("Failed to process contact {}: {err}", contact.alias);
                err.to_string()
            });
        if let Ok(resolution) = &result {
            resolved.insert(contact.alias.clone(), resolution.arn.clone());
        }
        contact_reports.push(ContactReport { alias: contact.alias.clone(), result });
    }

    info!("--- [2/2] Processing {} response plan update(s) ---", config.response_plans.len());
    let mut plan_reports = Vec::with_capacity(config.response_plans.len());
    for plan in &config.response_plans {
        let result = update_response_plan(ctx, &arns, plan, &resolved, dry_run).map_err(|err| {
            error!("Failed to update response plan {}: {err}", plan.name);
            err.to_string()
        });
        plan_reports.push(PlanReport { name: plan.name.clone(), result });
    }

    Ok(ApplyReport {
        dry_run,
        region,
        account_id,
        contacts: contact_reports,
        plans: plan_reports,
    })
}
