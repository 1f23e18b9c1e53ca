//! Core LiveSession trait definition.

use crate::audio::AudioChunk;
use crate::error::Result;
use crate::events::ServerEvent;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// A real-time bidirectional streaming session.
///
/// Outbound audio frames go in via [`send_audio`](Self::send_audio); inbound
/// events come out via [`next_event`](Self::next_event) in the order the
/// transport delivered them.
///
/// # Example
///
/// ```rust,ignore
/// use colloquy_realtime::{LiveSession, ServerEvent};
///
/// async fn pump(session: &dyn LiveSession) -> Result<()> {
///     session.send_audio(&chunk).await?;
///     while let Some(event) = session.next_event().await {
///         match event? {
///             ServerEvent::AudioDelta { delta, .. } => { /* schedule playback */ }
///             ServerEvent::TurnComplete { .. } => break,
///             _ => {}
///         }
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait LiveSession: Send + Sync {
    /// Get the session ID.
    fn session_id(&self) -> &str;

    /// Check if the session is currently connected.
    fn is_connected(&self) -> bool;

    /// Send an audio frame to the server.
    ///
    /// The chunk's format tag is declared alongside the payload on the wire.
    async fn send_audio(&self, audio: &AudioChunk) -> Result<()>;

    /// Send base64-encoded audio directly.
    async fn send_audio_base64(&self, audio_base64: &str, mime_type: &str) -> Result<()>;

    /// Send a text message as a completed user turn.
    async fn send_text(&self, text: &str) -> Result<()>;

    /// Get the next event from the server.
    ///
    /// Returns `None` when the session is closed.
    async fn next_event(&self) -> Option<Result<ServerEvent>>;

    /// Get a stream of server events.
    fn events(&self) -> Pin<Box<dyn Stream<Item = Result<ServerEvent>> + Send + '_>>;

    /// Close the session gracefully.
    ///
    /// Closing an already-closed session is a no-op, not an error.
    async fn close(&self) -> Result<()>;
}

/// Extension trait for LiveSession with convenience methods.
#[async_trait]
pub trait LiveSessionExt: LiveSession {
    /// Collect all audio produced until the current turn completes.
    async fn collect_turn_audio(&self) -> Result<Vec<Vec<u8>>> {
        let mut audio_chunks = Vec::new();
        while let Some(event) = self.next_event().await {
            match event? {
                ServerEvent::AudioDelta { delta, .. } => {
                    audio_chunks.push(delta);
                }
                ServerEvent::TurnComplete { .. } => break,
                ServerEvent::Error { error, .. } => {
                    return Err(crate::error::LiveError::server(
                        error.code.unwrap_or_default(),
                        error.message,
                    ));
                }
                _ => {}
            }
        }
        Ok(audio_chunks)
    }
}

// Blanket implementation
impl<T: LiveSession> LiveSessionExt for T {}

/// A boxed session type for dynamic dispatch.
pub type BoxedSession = Box<dyn LiveSession>;
