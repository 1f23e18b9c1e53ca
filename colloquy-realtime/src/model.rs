//! Core LiveModel trait definition.

use crate::audio::AudioFormat;
use crate::config::LiveConfig;
use crate::error::Result;
use crate::session::BoxedSession;
use async_trait::async_trait;

/// A factory for creating live sessions.
///
/// Each provider implements this trait to supply its specific connection
/// logic; consumers hold a `dyn LiveModel` and never touch the wire format.
///
/// # Example
///
/// ```rust,ignore
/// use colloquy_realtime::{LiveModel, LiveConfig};
/// use colloquy_realtime::gemini::GeminiLiveModel;
///
/// let model = GeminiLiveModel::with_default_model(api_key);
/// let session = model.connect(LiveConfig::default().with_audio_only()).await?;
/// // ... use the session ...
/// session.close().await?;
/// ```
#[async_trait]
pub trait LiveModel: Send + Sync {
    /// Get the provider name (e.g., "gemini").
    fn provider(&self) -> &str;

    /// Get the model identifier.
    fn model_id(&self) -> &str;

    /// Get supported input audio formats.
    fn supported_input_formats(&self) -> Vec<AudioFormat>;

    /// Get supported output audio formats.
    fn supported_output_formats(&self) -> Vec<AudioFormat>;

    /// Get available voices for this model.
    fn available_voices(&self) -> Vec<&str>;

    /// Connect and create a new live session.
    ///
    /// Establishes the duplex transport and sends the session configuration.
    /// The whole sequence is bounded by `config.connect_timeout()`; a stalled
    /// handshake surfaces as [`LiveError::Timeout`](crate::LiveError::Timeout)
    /// rather than hanging the caller.
    async fn connect(&self, config: LiveConfig) -> Result<BoxedSession>;
}

/// A shared model type for thread-safe access.
pub type BoxedModel = std::sync::Arc<dyn LiveModel>;
