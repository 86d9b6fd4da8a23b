//! Recording adapter for the `ResponsePlansService` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::RemoteError;
use crate::ports::{ResponsePlanRecord, ResponsePlanSummary, ResponsePlansService};

const PORT: &str = "plans";

/// Records response plan calls while delegating to an inner implementation.
pub struct RecordingResponsePlans {
    inner: Box<dyn ResponsePlansService>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingResponsePlans {
    /// Wraps `inner`, appending each call to `recorder`.
    pub fn new(
        inner: Box<dyn ResponsePlansService>,
        recorder: Arc<Mutex<CassetteRecorder>>,
    ) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PlanInput<'a> {
    plan_arn: &'a str,
}

#[derive(Serialize)]
struct EngagementsInput<'a> {
    plan_arn: &'a str,
    engagements: &'a [String],
}

impl ResponsePlansService for RecordingResponsePlans {
    fn get_response_plan(&self, plan_arn: &str) -> Result<ResponsePlanRecord, RemoteError> {
        let result = self.inner.get_response_plan(plan_arn);
        record_result(&self.recorder, PORT, "get_response_plan", &PlanInput { plan_arn }, &result);
        result
    }

    fn update_response_plan_engagements(
        &self,
        plan_arn: &str,
        engagements: &[String],
    ) -> Result<(), RemoteError> {
        let result = self.inner.update_response_plan_engagements(plan_arn, engagements);
        let input = EngagementsInput { plan_arn, engagements };
        record_result(&self.recorder, PORT, "update_response_plan_engagements", &input, &result);
        result
    }

    fn list_response_plans(&self) -> Result<Vec<ResponsePlanSummary>, RemoteError> {
        let result = self.inner.list_response_plans();
        record_result(&self.recorder, PORT, "list_response_plans", &(), &result);
        result
    }
}
