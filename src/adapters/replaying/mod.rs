//! Replaying adapters: serve recorded port results from a cassette.

pub mod contacts;
pub mod identity;
pub mod plans;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::RemoteError;

pub use contacts::ReplayingContacts;
pub use identity::ReplayingIdentity;
pub use plans::ReplayingResponsePlans;

/// Takes the next recorded output for `port::method`.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_interaction(port, method).output.clone()
}

/// Decodes an output written by `recording::record_result`.
///
/// A malformed output surfaces as a transport error naming the call.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, RemoteError> {
    let malformed = |e: serde_json::Error| {
        RemoteError::Transport(format!("{context}: malformed cassette output: {e}"))
    };
    if let Some(err) = output.get("Err") {
        let err: RemoteError = serde_json::from_value(err.clone()).map_err(malformed)?;
        return Err(err);
    }
    let value = output.get("Ok").cloned().unwrap_or(serde_json::Value::Null);
    serde_json::from_value(value).map_err(malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn err_keeps_variant() {
        let output = json!({"Err": {"kind": "not_found", "detail": "contact x"}});
        let result: Result<String, _> = replay_result(&output, "contacts::get_contact");
        assert_eq!(result, Err(RemoteError::NotFound("contact x".into())));
    }

    #[test]
    fn unit_ok_replays_from_null() {
        let result: Result<(), _> = replay_result(&json!({"Ok": null}), "contacts::delete_contact");
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn malformed_output_is_a_transport_error() {
        let result: Result<Vec<String>, _> =
            replay_result(&json!({"Ok": 42}), "plans::list_response_plans");
        assert!(matches!(result, Err(RemoteError::Transport(msg)) if msg.contains("plans::")));
    }
}
