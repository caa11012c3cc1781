// Client state service - Upgrades stored browser state, falling back to defaults
use crate::domain::client_state::{ClientStateKey, StateEnvelope, migrate};

/// Never fails: corrupt or unsupported blobs are logged and replaced with the default.
pub fn decode_client_state(key: ClientStateKey, raw: &str) -> StateEnvelope {
    match migrate(key, raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(key = key.storage_key(), error = %e, "discarding unreadable client state");
            StateEnvelope::current(key.default_state())
        }
    }
}
