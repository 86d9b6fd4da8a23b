//! Port traits defining external boundaries.
//!
//! Each trait represents one remote service the workflows talk to
//! (contacts, response plans, caller identity). Implementations live in
//! `src/adapters/`.

pub mod contacts;
pub mod identity;
pub mod plans;

pub use contacts::{
    ChannelRecord, ChannelTarget, ChannelType, ContactRecord, ContactsService, NewChannel,
    NewContact, PlanStage,
};
pub use identity::IdentityService;
pub use plans::{ResponsePlanRecord, ResponsePlanSummary, ResponsePlansService};
