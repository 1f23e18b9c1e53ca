//! # colloquy-realtime
//!
//! Bidirectional audio streaming transport for live voice conversations.
//!
//! This crate provides the wire-facing half of the colloquy stack: a unified
//! event model, session configuration, and a provider seam (`LiveModel` /
//! `LiveSession`) with a WebSocket implementation for the Gemini Live API.
//! The local media plumbing (microphone capture, PCM conversion, playback
//! scheduling) lives in `colloquy-audio`, which drives sessions created here.
//!
//! ```text
//!     ┌──────────────────┐   connect(config)    ┌──────────────────┐
//!     │    LiveModel     ├─────────────────────▶│   LiveSession    │
//!     │ (session factory)│                      │ (duplex channel) │
//!     └──────────────────┘                      └────────┬─────────┘
//!                                                        │
//!                              send_audio ──▶  WebSocket │ ──▶ ServerEvent
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use colloquy_realtime::{LiveConfig, LiveModel, ServerEvent};
//! use colloquy_realtime::gemini::GeminiLiveModel;
//!
//! let model = GeminiLiveModel::with_default_model(api_key);
//! let config = LiveConfig::default()
//!     .with_voice("Zephyr")
//!     .with_audio_only();
//!
//! let session = model.connect(config).await?;
//! while let Some(event) = session.next_event().await {
//!     match event? {
//!         ServerEvent::AudioDelta { delta, .. } => { /* play audio */ }
//!         ServerEvent::Interrupted { .. } => { /* cut playback */ }
//!         _ => {}
//!     }
//! }
//! session.close().await?;
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod session;

// Provider implementations
pub mod gemini;

// Re-exports
pub use audio::{AudioChunk, AudioFormat};
pub use config::{LiveConfig, LiveConfigBuilder};
pub use error::{LiveError, Result};
pub use events::{ErrorInfo, ServerEvent};
pub use model::LiveModel;
pub use session::LiveSession;
