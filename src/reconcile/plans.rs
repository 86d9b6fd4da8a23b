//! Response plan updater: rewrites a plan's engagement list.

use tracing::{debug, info, warn};

use super::AliasMap;
use crate::arn::ArnBuilder;
use crate::config::ResponsePlanSpec;
use crate::context::ServiceContext;
use crate::error::RemoteError;

/// Outcome of updating one response plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// The engagement list was overwritten.
    Updated {
        /// Contact ARNs now engaged, in declared order.
        engagements: Vec<String>,
        /// Declared aliases that had no resolved contact.
        skipped: Vec<String>,
    },
    /// The engagement list already matched; nothing was sent.
    Unchanged {
        /// Contact ARNs engaged.
        engagements: Vec<String>,
    },
    /// A live run would overwrite the engagement list.
    WouldUpdate {
        /// Contact ARNs that would be engaged.
        engagements: Vec<String>,
        /// Declared aliases that had no resolved contact.
        skipped: Vec<String>,
    },
    /// The plan does not exist remotely.
    NotFound,
    /// None of the declared aliases resolved; the plan was left alone.
    NoResolvedContacts,
}

/// Overwrites the plan's engagement list with the resolved contact ARNs.
///
/// Aliases missing from `resolved` are dropped with a warning. Only the
/// engagement field is sent; every other plan field stays as it is.
///
/// # Errors
///
/// Returns remote failures other than a missing plan.
pub fn update_response_plan(
    ctx: &ServiceContext,
    arns: &ArnBuilder,
    plan: &ResponsePlanSpec,
    resolved: &AliasMap,
    dry_run: bool,
) -> Result<PlanOutcome, RemoteError> {
    let name = plan.name.as_str();
    let mut engagements = Vec::with_capacity(plan.contacts.len());
    let mut skipped = Vec::new();
    for alias in &plan.contacts {
        match resolved.get(alias) {
            Some(arn) => engagements.push(arn.clone()),
            None => {
                warn!("Contact alias '{alias}' was not resolved; leaving it out of {name}");
                skipped.push(alias.clone());
            }
        }
    }

    if engagements.is_empty() {
        warn!("No resolved contacts for response plan {name}");
        return Ok(PlanOutcome::NoResolvedContacts);
    }

    let plan_arn = arns.response_plan(name);
    let current = match ctx.plans.get_response_plan(&plan_arn) {
        Ok(current) => current,
        Err(err) if err.is_not_found() => {
            warn!("Response plan not found: {name}");
            return Ok(PlanOutcome::NotFound);
        }
        Err(err) => return Err(err),
    };
    debug!("Found existing response plan: {name}");

    if current.engagements == engagements {
        info!("Response plan {name} already engages {} contact(s)", engagements.len());
        return Ok(PlanOutcome::Unchanged { engagements });
    }

    if dry_run {
        warn!("[DRY RUN] Would update response plan {name} with {} contact(s)", engagements.len());
        return Ok(PlanOutcome::WouldUpdate { engagements, skipped });
    }

    ctx.plans.update_response_plan_engagements(&plan_arn, &engagements)?;
    info!("Updated response plan {name} with {} contact(s)", engagements.len());
    Ok(PlanOutcome::Updated { engagements, skipped })
}
