//! Recording adapter for the `IdentityService` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::RemoteError;
use crate::ports::IdentityService;

/// Records identity lookups while delegating to an inner implementation.
pub struct RecordingIdentity {
    inner: Box<dyn IdentityService>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingIdentity {
    /// Wraps `inner`, appending each call to `recorder`.
    pub fn new(inner: Box<dyn IdentityService>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl IdentityService for RecordingIdentity {
    fn account_id(&self) -> Result<String, RemoteError> {
        let result = self.inner.account_id();
        record_result(&self.recorder, "identity", "account_id", &(), &result);
        result
    }
}
