//! Gemini Live API provider.
//!
//! WebSocket implementation of the live traits against Google's
//! BidiGenerateContent endpoint.
//!
//! Protocol notes:
//!
//! - Input audio: 16kHz mono PCM, base64 inside `realtimeInput.mediaChunks`
//! - Output audio: 24kHz mono PCM, base64 inside `serverContent.modelTurn`
//! - Interruption and turn boundaries arrive as flags on `serverContent`
//!
//! # Example
//!
//! ```rust,ignore
//! use colloquy_realtime::gemini::GeminiLiveModel;
//! use colloquy_realtime::{LiveModel, LiveConfig};
//!
//! let model = GeminiLiveModel::with_default_model(std::env::var("GOOGLE_API_KEY")?);
//! let session = model.connect(LiveConfig::default().with_voice("Zephyr")).await?;
//! // ... use the session ...
//! session.close().await?;
//! ```

mod model;
mod session;

pub use model::GeminiLiveModel;
pub use session::GeminiLiveSession;

/// Gemini Live API WebSocket URL.
pub const GEMINI_LIVE_URL: &str = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";

/// Default model for Gemini Live.
pub const DEFAULT_MODEL: &str = "models/gemini-2.5-flash-native-audio-preview-09-2025";

/// Available voices for Gemini Live (varies by model).
pub const GEMINI_VOICES: &[&str] = &["Puck", "Charon", "Kore", "Fenrir", "Aoede", "Zephyr", "Orus"];
