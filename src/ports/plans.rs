//! Response plans port.

use serde::{Deserialize, Serialize};

use crate::error::RemoteError;

/// A response plan as reported by the service.
///
/// Only `engagements` is ever written by this tool; the other fields are
/// carried so callers can check that an update left them untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePlanRecord {
    /// Response plan ARN.
    pub arn: String,
    /// Response plan name.
    pub name: String,
    /// Display name, if set.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Contact ARNs engaged when an incident opens.
    #[serde(default)]
    pub engagements: Vec<String>,
    /// Title of incidents created from this plan.
    #[serde(default)]
    pub incident_title: Option<String>,
    /// Impact of incidents created from this plan (1 = critical).
    #[serde(default)]
    pub impact: Option<i32>,
}

/// Summary entry returned when listing response plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePlanSummary {
    /// Response plan ARN.
    pub arn: String,
    /// Response plan name.
    pub name: String,
}

/// Reads and updates response plans.
pub trait ResponsePlansService: Send + Sync {
    /// Fetches a response plan by ARN.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] when the plan does not exist.
    fn get_response_plan(&self, plan_arn: &str) -> Result<ResponsePlanRecord, RemoteError>;

    /// Overwrites the plan's engagement list. No other field is sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is missing or the update is rejected.
    fn update_response_plan_engagements(
        &self,
        plan_arn: &str,
        engagements: &[String],
    ) -> Result<(), RemoteError>;

    /// Lists every response plan in the account and region.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    fn list_response_plans(&self) -> Result<Vec<ResponsePlanSummary>, RemoteError>;
}
