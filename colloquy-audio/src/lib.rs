//! # colloquy-audio
//!
//! Local media plumbing for live voice conversations: PCM conversion,
//! gapless playback scheduling, microphone capture, and the
//! [`Conversation`] orchestrator that wires them to a
//! [`colloquy_realtime`] session.
//!
//! ```text
//!   microphone ──▶ CaptureSource ──▶ encode_frame ──▶ LiveSession.send_audio
//!                                                          │
//!   speaker ◀── PlaybackSink ◀── PlaybackScheduler ◀── decode_frame ◀── events
//! ```
//!
//! The device seams (`CaptureSource`, `PlaybackSink`, `OutputClock`) are
//! traits, so the whole pipeline runs against test doubles without audio
//! hardware. cpal-backed implementations live behind the `desktop-audio`
//! feature.
//!
//! ## Example
//!
//! ```rust,ignore
//! use colloquy_audio::{Conversation, device};
//! use colloquy_realtime::{LiveConfig, gemini::GeminiLiveModel};
//!
//! let model = GeminiLiveModel::with_default_model(api_key);
//! let (capture, sink, clock) = device::desktop_io()?;
//!
//! let mut conversation = Conversation::new();
//! conversation
//!     .start(&model, Box::new(capture), sink, clock, LiveConfig::default().with_audio_only())
//!     .await?;
//! conversation.run().await?; // until the session ends
//! ```

pub mod capture;
pub mod conversation;
pub mod error;
pub mod pcm;
pub mod scheduler;

#[cfg(feature = "desktop-audio")]
pub mod device;

// Re-exports
pub use capture::{CaptureSource, FrameHandler};
pub use conversation::{Conversation, EventHandler, NoOpEventHandler, SessionState};
pub use error::{AudioError, Result};
pub use pcm::{AudioBuffer, decode_frame, encode_frame};
pub use scheduler::{
    MonotonicClock, OutputClock, PlaybackId, PlaybackScheduler, PlaybackSink, ScheduledPlayback,
};
