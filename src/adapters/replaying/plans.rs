//! Replaying adapter for the `ResponsePlansService` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::RemoteError;
use crate::ports::{ResponsePlanRecord, ResponsePlanSummary, ResponsePlansService};

/// Replays recorded response plan calls.
pub struct ReplayingResponsePlans {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingResponsePlans {
    /// Creates a replaying adapter from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ResponsePlansService for ReplayingResponsePlans {
    fn get_response_plan(&self, _plan_arn: &str) -> Result<ResponsePlanRecord, RemoteError> {
        let output = next_output(&self.replayer, "plans", "get_response_plan");
        replay_result(&output, "plans::get_response_plan")
    }

    fn update_response_plan_engagements(
        &self,
        _plan_arn: &str,
        _engagements: &[String],
    ) -> Result<(), RemoteError> {
        let output = next_output(&self.replayer, "plans", "update_response_plan_engagements");
        replay_result(&output, "plans::update_response_plan_engagements")
    }

    fn list_response_plans(&self) -> Result<Vec<ResponsePlanSummary>, RemoteError> {
        let output = next_output(&self.replayer, "plans", "list_response_plans");
        replay_result(&output, "plans::list_response_plans")
    }
}
