// Versioned client-side state envelopes
//
// Browser storage blobs are wrapped as `{ "version": N, "data": ... }`.
// Anything without that wrapper is treated as version 0 and migrated forward
// one version at a time.
use super::chat::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStateKey {
    Conversations,
    TrainingProgress,
    TrainingCartiProgress,
    AutoNavigate,
}

impl ClientStateKey {
    pub const ALL: [ClientStateKey; 4] = [
        ClientStateKey::Conversations,
        ClientStateKey::TrainingProgress,
        ClientStateKey::TrainingCartiProgress,
        ClientStateKey::AutoNavigate,
    ];

    pub fn storage_key(self) -> &'static str {
        match self {
            ClientStateKey::Conversations => "bear-conversations",
            ClientStateKey::TrainingProgress => "bear-training-progress",
            ClientStateKey::TrainingCartiProgress => "bear-training-carti-progress",
            ClientStateKey::AutoNavigate => "bear-auto-navigate",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.storage_key() == key)
    }

    pub fn default_state(self) -> ClientState {
        match self {
            ClientStateKey::Conversations => ClientState::Conversations(ConversationsState::default()),
            ClientStateKey::TrainingProgress | ClientStateKey::TrainingCartiProgress => {
                ClientState::TrainingProgress(Vec::new())
            }
            ClientStateKey::AutoNavigate => ClientState::AutoNavigate(false),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatUiState {
    #[serde(default)]
    pub is_minimized: bool,
    #[serde(default)]
    pub active_conversation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConversation {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationsState {
    #[serde(default)]
    pub conversations: Vec<StoredConversation>,
    #[serde(default)]
    pub ui_state: ChatUiState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClientState {
    Conversations(ConversationsState),
    TrainingProgress(Vec<String>),
    AutoNavigate(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateEnvelope {
    pub version: u32,
    pub data: ClientState,
}

impl StateEnvelope {
    pub fn current(data: ClientState) -> Self {
        Self {
            version: CURRENT_VERSION,
            data,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientStateError {
    #[error("malformed client state: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("client state version {found} is newer than supported version {current}")]
    UnsupportedVersion { found: u32, current: u32 },

    #[error("invalid {key} state: {reason}")]
    InvalidShape { key: &'static str, reason: String },
}

/// Parses a raw storage blob and migrates it to the current version.
pub fn migrate(key: ClientStateKey, raw: &str) -> Result<StateEnvelope, ClientStateError> {
    let value: Value = serde_json::from_str(raw)?;
    let (mut version, mut data) = split_envelope(value);

    if version > CURRENT_VERSION {
        return Err(ClientStateError::UnsupportedVersion {
            found: version,
            current: CURRENT_VERSION,
        });
    }

    while version < CURRENT_VERSION {
        data = migrate_step(key, version, data)?;
        version += 1;
    }

    Ok(StateEnvelope::current(into_typed(key, data)?))
}

fn split_envelope(value: Value) -> (u32, Value) {
    if let Value::Object(map) = &value {
        if map.len() == 2 && map.contains_key("data") {
            if let Some(version) = map.get("version").and_then(Value::as_u64) {
                let data = map.get("data").cloned().unwrap_or(Value::Null);
                return (u32::try_from(version).unwrap_or(u32::MAX), data);
            }
        }
    }
    (0, value)
}

fn migrate_step(key: ClientStateKey, from: u32, data: Value) -> Result<Value, ClientStateError> {
    match from {
        0 => v0_to_v1(key, data),
        found => Err(ClientStateError::UnsupportedVersion {
            found,
            current: CURRENT_VERSION,
        }),
    }
}

fn v0_to_v1(key: ClientStateKey, data: Value) -> Result<Value, ClientStateError> {
    let invalid = |reason: &str| ClientStateError::InvalidShape {
        key: key.storage_key(),
        reason: reason.to_string(),
    };

    match key {
        ClientStateKey::Conversations => match data {
            Value::Array(conversations) => {
                let mut map = Map::new();
                map.insert("conversations".to_string(), Value::Array(conversations));
                map.insert("uiState".to_string(), Value::Object(Map::new()));
                Ok(Value::Object(map))
            }
            Value::Object(map) => Ok(Value::Object(map)),
            _ => Err(invalid("expected a list of conversations")),
        },
        ClientStateKey::TrainingProgress | ClientStateKey::TrainingCartiProgress => {
            let Value::Array(items) = data else {
                return Err(invalid("expected a list of completed module ids"));
            };
            let mut ids: Vec<Value> = Vec::with_capacity(items.len());
            for item in items {
                if !item.is_string() {
                    return Err(invalid("module ids must be strings"));
                }
                if !ids.contains(&item) {
                    ids.push(item);
                }
            }
            Ok(Value::Array(ids))
        }
        ClientStateKey::AutoNavigate => match data {
            Value::Bool(flag) => Ok(Value::Bool(flag)),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err(invalid("expected a boolean flag")),
        },
    }
}

fn into_typed(key: ClientStateKey, data: Value) -> Result<ClientState, ClientStateError> {
    Ok(match key {
        ClientStateKey::Conversations => ClientState::Conversations(serde_json::from_value(data)?),
        ClientStateKey::TrainingProgress | ClientStateKey::TrainingCartiProgress => {
            ClientState::TrainingProgress(serde_json::from_value(data)?)
        }
        ClientStateKey::AutoNavigate => ClientState::AutoNavigate(serde_json::from_value(data)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_parse() {
        for key in ClientStateKey::ALL {
            assert_eq!(ClientStateKey::parse(key.storage_key()), Some(key));
        }
        assert_eq!(ClientStateKey::parse("bear-unknown"), None);
    }

    #[test]
    fn test_legacy_conversation_array_is_wrapped() {
        let raw = r#"[{"id":"c1","title":"Battery check","messages":[{"role":"user","content":"hi"}]}]"#;
        let envelope = migrate(ClientStateKey::Conversations, raw).unwrap();

        assert_eq!(envelope.version, CURRENT_VERSION);
        match envelope.data {
            ClientState::Conversations(state) => {
                assert_eq!(state.conversations.len(), 1);
                assert_eq!(state.conversations[0].messages.len(), 1);
                assert!(!state.ui_state.is_minimized);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_current_envelope_passes_through() {
        let raw = r#"{"version":1,"data":{"conversations":[],"uiState":{"isMinimized":true}}}"#;
        let envelope = migrate(ClientStateKey::Conversations, raw).unwrap();
        match envelope.data {
            ClientState::Conversations(state) => assert!(state.ui_state.is_minimized),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_training_progress_deduplicated() {
        let envelope = migrate(ClientStateKey::TrainingProgress, r#"["intro","safety","intro"]"#).unwrap();
        assert_eq!(
            envelope.data,
            ClientState::TrainingProgress(vec!["intro".to_string(), "safety".to_string()])
        );
    }

    #[test]
    fn test_auto_navigate_string_flag() {
        let envelope = migrate(ClientStateKey::AutoNavigate, r#""true""#).unwrap();
        assert_eq!(envelope.data, ClientState::AutoNavigate(true));

        let envelope = migrate(ClientStateKey::AutoNavigate, "false").unwrap();
        assert_eq!(envelope.data, ClientState::AutoNavigate(false));
    }

    #[test]
    fn test_corrupt_json_is_malformed() {
        let err = migrate(ClientStateKey::Conversations, "{not json").unwrap_err();
        assert!(matches!(err, ClientStateError::Malformed(_)));
    }

    #[test]
    fn test_future_version_rejected() {
        let err = migrate(ClientStateKey::AutoNavigate, r#"{"version":9,"data":true}"#).unwrap_err();
        assert!(matches!(err, ClientStateError::UnsupportedVersion { found: 9, .. }));
    }

    #[test]
    fn test_wrong_shape_rejected() {
        let err = migrate(ClientStateKey::TrainingCartiProgress, r#"[1, 2]"#).unwrap_err();
        assert!(matches!(err, ClientStateError::InvalidShape { .. }));
    }
}
