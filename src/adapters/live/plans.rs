//! Live adapter for the `ResponsePlansService` port (`aws-sdk-ssmincidents`).

use std::sync::Arc;

use aws_sdk_ssmincidents::types::IncidentTemplate;
use aws_sdk_ssmincidents::Client;
use tokio::runtime::Runtime;

use super::{classify, optional};
use crate::error::RemoteError;
use crate::ports::{ResponsePlanRecord, ResponsePlanSummary, ResponsePlansService};

/// Response plans client blocking on a shared runtime.
pub struct LiveResponsePlans {
    client: Client,
    runtime: Arc<Runtime>,
}

impl LiveResponsePlans {
    /// Wraps an SDK client.
    #[must_use]
    pub fn new(client: Client, runtime: Arc<Runtime>) -> Self {
        Self { client, runtime }
    }
}

impl ResponsePlansService for LiveResponsePlans {
    fn get_response_plan(&self, plan_arn: &str) -> Result<ResponsePlanRecord, RemoteError> {
        let output = self
            .runtime
            .block_on(self.client.get_response_plan().arn(plan_arn).send())
            .map_err(|e| classify(&e))?;
        let template: Option<&IncidentTemplate> = optional(output.incident_template());
        Ok(ResponsePlanRecord {
            arn: output.arn().to_string(),
            name: output.name().to_string(),
            display_name: output.display_name().map(str::to_string),
            engagements: output.engagements().to_vec(),
            incident_title: template.map(|t| t.title().to_string()),
            impact: template.and_then(|t| optional(t.impact())),
        })
    }

    fn update_response_plan_engagements(
        &self,
        plan_arn: &str,
        engagements: &[String],
    ) -> Result<(), RemoteError> {
        self.runtime
            .block_on(
                self.client
                    .update_response_plan()
                    .arn(plan_arn)
                    .set_engagements(Some(engagements.to_vec()))
                    .send(),
            )
            .map_err(|e| classify(&e))?;
        Ok(())
    }

    fn list_response_plans(&self) -> Result<Vec<ResponsePlanSummary>, RemoteError> {
        let mut plans = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let request = self.client.list_response_plans().set_next_token(next_token.take());
            let output = self.runtime.block_on(request.send()).map_err(|e| classify(&e))?;
            plans.extend(output.response_plan_summaries().iter().map(|summary| {
                ResponsePlanSummary {
                    arn: summary.arn().to_string(),
                    name: summary.name().to_string(),
                }
            }));
            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }
        Ok(plans)
    }
}
