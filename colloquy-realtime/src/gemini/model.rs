//! Gemini Live model implementation.

use crate::audio::AudioFormat;
use crate::config::LiveConfig;
use crate::error::Result;
use crate::model::LiveModel;
use crate::session::BoxedSession;
use async_trait::async_trait;

use super::session::GeminiLiveSession;
use super::{DEFAULT_MODEL, GEMINI_VOICES};

/// Gemini Live model for creating realtime sessions.
///
/// # Example
///
/// ```rust,ignore
/// use colloquy_realtime::gemini::GeminiLiveModel;
/// use colloquy_realtime::LiveModel;
///
/// let model = GeminiLiveModel::new("api-key", "models/gemini-2.5-flash-native-audio-preview-09-2025");
/// let session = model.connect(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct GeminiLiveModel {
    api_key: String,
    model_id: String,
}

impl GeminiLiveModel {
    /// Create a new Gemini Live model.
    pub fn new(api_key: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), model_id: model_id.into() }
    }

    /// Create with the default Live model.
    pub fn with_default_model(api_key: impl Into<String>) -> Self {
        Self::new(api_key, DEFAULT_MODEL)
    }
}

#[async_trait]
impl LiveModel for GeminiLiveModel {
    fn provider(&self) -> &str {
        "gemini"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn supported_input_formats(&self) -> Vec<AudioFormat> {
        vec![AudioFormat::capture()]
    }

    fn supported_output_formats(&self) -> Vec<AudioFormat> {
        vec![AudioFormat::playback()]
    }

    fn available_voices(&self) -> Vec<&str> {
        GEMINI_VOICES.to_vec()
    }

    async fn connect(&self, config: LiveConfig) -> Result<BoxedSession> {
        let model_id = config.model.clone().unwrap_or_else(|| self.model_id.clone());
        let session = GeminiLiveSession::connect(&self.api_key, &model_id, config).await?;

        Ok(Box::new(session))
    }
}
