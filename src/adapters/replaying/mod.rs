//! Replaying adapters that serve recorded interactions from cassettes.

pub mod image_service;

use std::sync::{Arc, Mutex};

use crate::cassette::replayer::CassetteReplayer;

/// Retrieve the next recorded output for a given port and method.
///
/// # Errors
///
/// Returns an error if the cassette has no more interactions for the pair.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, String> {
    let mut guard = replayer.lock().map_err(|e| format!("Replayer lock poisoned: {e}"))?;
    guard.next_interaction(port, method).map(|i| i.output)
}

/// Deserialize a replayed output as `Result<T, E>`.
///
/// The outer error reports an output that fits neither the `Ok` nor the
/// `Err` shape.
pub(crate) fn replay_result<T, E>(output: serde_json::Value) -> Result<Result<T, E>, String>
where
    T: serde::de::DeserializeOwned,
    E: serde::de::DeserializeOwned,
{
    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        return serde_json::from_value(err_val.clone())
            .map(Err)
            .map_err(|e| format!("Unreadable recorded error: {e}"));
    }
    let ok_val = output.get("Ok").or_else(|| output.get("ok")).unwrap_or(&output);
    serde_json::from_value(ok_val.clone())
        .map(Ok)
        .map_err(|e| format!("Unreadable recorded output: {e}"))
}
