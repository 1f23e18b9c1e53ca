//! Error types for the audio pipeline.

use colloquy_realtime::LiveError;
use thiserror::Error;

/// Result type for audio pipeline operations.
pub type Result<T> = std::result::Result<T, AudioError>;

/// Errors that can occur in the local audio pipeline.
#[derive(Error, Debug)]
pub enum AudioError {
    /// No usable audio device, or permission to use it was denied.
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// An audio stream could not be built or started.
    #[error("Audio stream error: {0}")]
    StreamError(String),

    /// The underlying live session failed.
    #[error(transparent)]
    Live(#[from] LiveError),
}

impl AudioError {
    /// Create a new device error.
    pub fn device<S: Into<String>>(msg: S) -> Self {
        Self::DeviceUnavailable(msg.into())
    }

    /// Create a new stream error.
    pub fn stream<S: Into<String>>(msg: S) -> Self {
        Self::StreamError(msg.into())
    }
}
