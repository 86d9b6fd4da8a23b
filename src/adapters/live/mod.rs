//! Live adapters backed by the AWS SDK for Rust.
//!
//! The ports are synchronous, so the adapters share one current-thread
//! tokio runtime and block on each SDK call. SDK-level retries are turned
//! off: every port call is a single attempt.

pub mod contacts;
pub mod identity;
pub mod plans;

use std::fmt::Debug;
use std::sync::Arc;

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ssmcontacts::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use tokio::runtime::Runtime;

use crate::error::RemoteError;

pub use contacts::LiveContacts;
pub use identity::LiveIdentity;
pub use plans::LiveResponsePlans;

/// Resolved SDK configuration plus the runtime the adapters block on.
#[derive(Clone)]
pub struct AwsSession {
    runtime: Arc<Runtime>,
    config: SdkConfig,
}

impl AwsSession {
    /// Loads credentials and settings from the default provider chain for
    /// `region`.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be started.
    pub fn connect(region: &str) -> Result<Self, String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {e}"))?;
        let config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_string()))
                .retry_config(RetryConfig::disabled())
                .load(),
        );
        Ok(Self { runtime: Arc::new(runtime), config })
    }

    /// Contacts adapter sharing this session.
    #[must_use]
    pub fn contacts(&self) -> LiveContacts {
        LiveContacts::new(aws_sdk_ssmcontacts::Client::new(&self.config), self.runtime.clone())
    }

    /// Response plans adapter sharing this session.
    #[must_use]
    pub fn plans(&self) -> LiveResponsePlans {
        LiveResponsePlans::new(
            aws_sdk_ssmincidents::Client::new(&self.config),
            self.runtime.clone(),
        )
    }

    /// Identity adapter sharing this session.
    #[must_use]
    pub fn identity(&self) -> LiveIdentity {
        LiveIdentity::new(aws_sdk_sts::Client::new(&self.config), self.runtime.clone())
    }
}

/// Maps an SDK failure onto the port error taxonomy.
pub(crate) fn classify<E, R>(err: &SdkError<E, R>) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: Debug,
{
    let message = err.message().unwrap_or_default().to_string();
    match err.code() {
        Some("ConflictException") => RemoteError::Conflict(message),
        Some("ResourceNotFoundException") => RemoteError::NotFound(message),
        Some(code) => RemoteError::service(code, message),
        None => RemoteError::Transport(DisplayErrorContext(err).to_string()),
    }
}

/// SDK accessors return either `T` or `Option<T>` depending on whether the
/// member is required; this accepts both.
pub(crate) fn optional<T>(value: impl Into<Option<T>>) -> Option<T> {
    value.into()
}
