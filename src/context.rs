//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::memory::InMemoryIncidentManager;
use crate::adapters::recording::{RecordingContacts, RecordingIdentity, RecordingResponsePlans};
use crate::adapters::replaying::{ReplayingContacts, ReplayingIdentity, ReplayingResponsePlans};
use crate::cassette::config::CassetteConfig;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::error::RemoteError;
use crate::ports::{
    ChannelRecord, ContactRecord, ContactsService, IdentityService, NewChannel, NewContact,
    PlanStage, ResponsePlanRecord, ResponsePlanSummary, ResponsePlansService,
};

/// Bundles all port trait objects into a single context.
///
/// Each field is one remote boundary. Constructors wire up different
/// adapter implementations (live, in-memory, replaying, recording).
pub struct ServiceContext {
    /// Contacts, channels and engagement plans.
    pub contacts: Box<dyn ContactsService>,
    /// Response plans.
    pub plans: Box<dyn ResponsePlansService>,
    /// Caller identity.
    pub identity: Box<dyn IdentityService>,
}

impl ServiceContext {
    /// Creates a live context talking to AWS in `region`.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDK cannot be initialised.
    #[cfg(feature = "aws")]
    pub fn live(region: &str) -> Result<Self, String> {
        let session = crate::adapters::live::AwsSession::connect(region)?;
        Ok(Self {
            contacts: Box::new(session.contacts()),
            plans: Box::new(session.plans()),
            identity: Box::new(session.identity()),
        })
    }

    /// Creates a live context talking to AWS in `region`.
    ///
    /// # Errors
    ///
    /// Always fails: this build has no AWS client.
    #[cfg(not(feature = "aws"))]
    pub fn live(region: &str) -> Result<Self, String> {
        Err(format!(
            "cannot reach AWS ({region}): oncall was built without the `aws` feature; \
             rebuild with `--features aws` or set ONCALL_REPLAY to a cassette"
        ))
    }

    /// Creates a context over a simulated account. All three ports share
    /// the account's state.
    #[must_use]
    pub fn in_memory(account: &InMemoryIncidentManager) -> Self {
        Self {
            contacts: Box::new(account.clone()),
            plans: Box::new(account.clone()),
            identity: Box::new(account.clone()),
        }
    }

    /// Wraps every port of `inner` so its calls are written to `session`.
    #[must_use]
    pub fn recording(inner: Self, session: &RecordingSession) -> Self {
        Self {
            contacts: Box::new(RecordingContacts::new(inner.contacts, session.contacts.clone())),
            plans: Box::new(RecordingResponsePlans::new(inner.plans, session.plans.clone())),
            identity: Box::new(RecordingIdentity::new(inner.identity, session.identity.clone())),
        }
    }

    /// Creates a replaying context from a single cassette file holding
    /// every port's interactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = CassetteConfig::read_cassette(path)?;
        // Each port gets its own replayer so cursors stay independent.
        Ok(Self {
            contacts: Box::new(ReplayingContacts::new(CassetteReplayer::new(&cassette))),
            plans: Box::new(ReplayingResponsePlans::new(CassetteReplayer::new(&cassette))),
            identity: Box::new(ReplayingIdentity::new(CassetteReplayer::new(&cassette))),
        })
    }

    /// Creates a replaying context from per-port cassette files. Ports
    /// without a cassette panic with a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        Ok(Self {
            contacts: match replayers.contacts {
                Some(r) => Box::new(ReplayingContacts::new(r)),
                None => Box::new(Unconfigured),
            },
            plans: match replayers.plans {
                Some(r) => Box::new(ReplayingResponsePlans::new(r)),
                None => Box::new(Unconfigured),
            },
            identity: match replayers.identity {
                Some(r) => Box::new(ReplayingIdentity::new(r)),
                None => Box::new(Unconfigured),
            },
        })
    }
}

/// Stand-in for a port that has no cassette loaded.
struct Unconfigured;

fn unconfigured(port: &str) -> ! {
    panic!("{port} port not configured in CassetteConfig: no cassette loaded for {port}");
}

impl ContactsService for Unconfigured {
    fn create_contact(&self, _contact: &NewContact) -> Result<String, RemoteError> {
        unconfigured("contacts")
    }
    fn get_contact(&self, _contact_arn: &str) -> Result<ContactRecord, RemoteError> {
        unconfigured("contacts")
    }
    fn update_contact_plan(
        &self,
        _contact_arn: &str,
        _stages: &[PlanStage],
    ) -> Result<(), RemoteError> {
        unconfigured("contacts")
    }
    fn create_contact_channel(&self, _channel: &NewChannel) -> Result<String, RemoteError> {
        unconfigured("contacts")
    }
    fn list_contact_channels(
        &self,
        _contact_arn: &str,
    ) -> Result<Vec<ChannelRecord>, RemoteError> {
        unconfigured("contacts")
    }
    fn delete_contact_channel(&self, _channel_arn: &str) -> Result<(), RemoteError> {
        unconfigured("contacts")
    }
    fn delete_contact(&self, _contact_arn: &str) -> Result<(), RemoteError> {
        unconfigured("contacts")
    }
}

impl ResponsePlansService for Unconfigured {
    fn get_response_plan(&self, _plan_arn: &str) -> Result<ResponsePlanRecord, RemoteError> {
        unconfigured("plans")
    }
    fn update_response_plan_engagements(
        &self,
        _plan_arn: &str,
        _engagements: &[String],
    ) -> Result<(), RemoteError> {
        unconfigured("plans")
    }
    fn list_response_plans(&self) -> Result<Vec<ResponsePlanSummary>, RemoteError> {
        unconfigured("plans")
    }
}

impl IdentityService for Unconfigured {
    fn account_id(&self) -> Result<String, RemoteError> {
        unconfigured("identity")
    }
}
