//! Event types for realtime communication.
//!
//! Provider-specific wire messages are translated into this unified event
//! vocabulary at the transport boundary, so consumers dispatch on a single
//! tagged enum regardless of the backing API.
//!
//! Audio data is transported as raw bytes (`Vec<u8>`) internally but
//! serialized as base64 for JSON compatibility.

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Custom serde for base64-encoded audio ───────────────────────────────

fn deserialize_audio_bytes<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
}

fn serialize_audio_bytes<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let s = base64::engine::general_purpose::STANDARD.encode(bytes);
    serializer.serialize_str(&s)
}

/// Events received from the realtime server.
///
/// In the `Open` steady state a session emits audio deltas, interruption
/// signals, turn boundaries, and lifecycle/error events — all folded into
/// this one dispatchable type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// The server acknowledged setup; the session is ready for audio.
    #[serde(rename = "session.ready")]
    SessionReady {
        /// Unique event ID.
        event_id: String,
        /// Raw session/setup details.
        session: Value,
    },

    /// A chunk of synthesized output audio.
    #[serde(rename = "response.audio.delta")]
    AudioDelta {
        /// Unique event ID.
        event_id: String,
        /// Audio data (raw bytes, serialized as base64 on the wire).
        #[serde(
            serialize_with = "serialize_audio_bytes",
            deserialize_with = "deserialize_audio_bytes"
        )]
        delta: Vec<u8>,
    },

    /// A chunk of output text (text modality or transcription).
    #[serde(rename = "response.text.delta")]
    TextDelta {
        /// Unique event ID.
        event_id: String,
        /// Text content.
        delta: String,
    },

    /// The user spoke over the model; in-flight playback must be cut.
    ///
    /// This cancels audio already scheduled locally. It does not close the
    /// session — generation resumes with the next turn.
    #[serde(rename = "response.interrupted")]
    Interrupted {
        /// Unique event ID.
        event_id: String,
    },

    /// The model finished its current turn.
    #[serde(rename = "response.turn_complete")]
    TurnComplete {
        /// Unique event ID.
        event_id: String,
    },

    /// The server announced it will drop the connection soon.
    #[serde(rename = "session.go_away")]
    GoAway {
        /// Unique event ID.
        event_id: String,
        /// Remaining time before disconnect, as reported by the server.
        #[serde(skip_serializing_if = "Option::is_none")]
        time_left: Option<String>,
    },

    /// Error occurred.
    #[serde(rename = "error")]
    Error {
        /// Unique event ID.
        event_id: String,
        /// Error details.
        error: ErrorInfo,
    },

    /// Unknown event type (for forward compatibility).
    #[serde(other)]
    Unknown,
}

/// Error information from the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorInfo {
    /// Create error info from a bare message.
    pub fn message(message: impl Into<String>) -> Self {
        Self { code: None, message: message.into() }
    }
}
