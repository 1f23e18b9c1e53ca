//! Live conversation orchestration.
//!
//! [`Conversation`] owns everything one voice session needs — the duplex
//! transport, the microphone, the playback scheduler — and drives the whole
//! pipeline: captured frames are PCM-encoded and forwarded outbound, inbound
//! audio is decoded and scheduled gaplessly, and interruption signals cut
//! playback without closing the session.
//!
//! Everything interleaves on one logical timeline: device callbacks hand off
//! through a channel, and all transport and scheduling work happens inside
//! [`run`](Conversation::run) on the caller's task.

use crate::capture::CaptureSource;
use crate::error::{AudioError, Result};
use crate::pcm::{self, AudioBuffer, PLAYBACK_SAMPLE_RATE};
use crate::scheduler::{OutputClock, PlaybackScheduler, PlaybackSink};
use async_trait::async_trait;
use colloquy_realtime::{
    AudioChunk, AudioFormat, LiveConfig, LiveError, LiveModel, ServerEvent,
    session::BoxedSession,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Lifecycle state of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session; ready to start.
    Idle,
    /// Transport and devices are being acquired.
    Connecting,
    /// Audio is flowing in both directions.
    Open,
    /// Torn down; a new start is required to converse again.
    Closed,
}

/// Observer for conversation events.
///
/// All methods default to no-ops; implement the ones you care about.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Called when a decoded audio buffer was scheduled for playback.
    async fn on_audio(&self, _audio: &AudioBuffer) -> Result<()> {
        Ok(())
    }

    /// Called when a text delta is received.
    async fn on_text(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    /// Called when the server interrupted in-flight playback.
    async fn on_interrupted(&self) -> Result<()> {
        Ok(())
    }

    /// Called when the model finished its turn.
    async fn on_turn_complete(&self) -> Result<()> {
        Ok(())
    }

    /// Called on any session error.
    async fn on_error(&self, _error: &LiveError) -> Result<()> {
        Ok(())
    }
}

/// Default no-op event handler.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventHandler;

#[async_trait]
impl EventHandler for NoOpEventHandler {}

// Outcome of one pump iteration, resolved after the borrows on session and
// channel have ended so teardown can take &mut self.
enum Step {
    Continue,
    Event(ServerEvent),
    Fatal(LiveError),
    Closed,
}

/// One live voice conversation.
///
/// Holds at most one open session. The microphone, the output device, and
/// the set of scheduled playback buffers are exclusively owned by the
/// active session: they are acquired in [`start`](Self::start) and released
/// on every teardown path.
///
/// # Example
///
/// ```rust,ignore
/// let mut conversation = Conversation::new();
/// conversation.start(&model, capture, sink, clock, config).await?;
/// conversation.run().await?; // pumps until the session ends
/// conversation.stop().await; // idempotent
/// ```
pub struct Conversation<S, C> {
    handler: Arc<dyn EventHandler>,
    session: Option<BoxedSession>,
    capture: Option<Box<dyn CaptureSource>>,
    scheduler: Option<PlaybackScheduler<S, C>>,
    outbound: Option<mpsc::UnboundedReceiver<AudioChunk>>,
    state: SessionState,
}

impl<S: PlaybackSink, C: OutputClock> Conversation<S, C> {
    /// Create an idle conversation.
    pub fn new() -> Self {
        Self {
            handler: Arc::new(NoOpEventHandler),
            session: None,
            capture: None,
            scheduler: None,
            outbound: None,
            state: SessionState::Idle,
        }
    }

    /// Set the event handler.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.handler = handler;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The active scheduler, if a session is open.
    pub fn scheduler(&self) -> Option<&PlaybackScheduler<S, C>> {
        self.scheduler.as_ref()
    }

    /// Open a session and wire up the audio pipeline.
    ///
    /// Any prior session is fully stopped first. The transport connect and
    /// the server's readiness acknowledgement are each bounded by the
    /// config's connect timeout, so a stalled handshake cannot wedge the
    /// conversation in `Connecting`. On any failure everything acquired so
    /// far is released and the conversation is restartable.
    pub async fn start(
        &mut self,
        model: &dyn LiveModel,
        mut capture: Box<dyn CaptureSource>,
        sink: S,
        clock: C,
        config: LiveConfig,
    ) -> Result<()> {
        if self.state != SessionState::Idle {
            self.stop().await;
        }
        self.state = SessionState::Connecting;

        let connect_timeout = config.connect_timeout();
        let capture_format = AudioFormat::new(capture.sample_rate(), 1, 16);

        let session = match tokio::time::timeout(connect_timeout, model.connect(config)).await {
            Ok(Ok(session)) => session,
            Ok(Err(e)) => {
                self.state = SessionState::Idle;
                return Err(e.into());
            }
            Err(_) => {
                self.state = SessionState::Idle;
                return Err(LiveError::timeout(format!(
                    "connect did not complete within {:?}",
                    connect_timeout
                ))
                .into());
            }
        };

        // Hold back the capture pipeline until the server acknowledges the
        // session, so no frame is sent into a half-open transport.
        let ready = tokio::time::timeout(connect_timeout, await_ready(session.as_ref())).await;
        match ready {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                close_quietly(session).await;
                self.state = SessionState::Idle;
                return Err(e);
            }
            Err(_) => {
                close_quietly(session).await;
                self.state = SessionState::Idle;
                return Err(LiveError::timeout(format!(
                    "server did not acknowledge setup within {:?}",
                    connect_timeout
                ))
                .into());
            }
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let capture_result = capture.start(Box::new(move |frame| {
            let chunk = AudioChunk::new(pcm::encode_frame(frame), capture_format);
            // The receiver is dropped only during teardown; frames captured
            // past that point are discarded, not an error.
            let _ = tx.send(chunk);
        }));
        if let Err(e) = capture_result {
            close_quietly(session).await;
            self.state = SessionState::Idle;
            return Err(e);
        }

        self.session = Some(session);
        self.capture = Some(capture);
        self.scheduler = Some(PlaybackScheduler::new(sink, clock));
        self.outbound = Some(rx);
        self.state = SessionState::Open;
        tracing::info!("Conversation open");
        Ok(())
    }

    /// Pump the conversation until the session ends.
    ///
    /// Forwards captured frames outbound in capture order and dispatches
    /// inbound events as they arrive. Returns `Ok(())` on a clean remote or
    /// local close; a transport failure tears everything down and surfaces
    /// as the error. In every case the conversation ends `Closed` with all
    /// resources released.
    pub async fn run(&mut self) -> Result<()> {
        let mut outbound_open = true;
        loop {
            let step = {
                let (Some(session), Some(outbound)) =
                    (self.session.as_ref(), self.outbound.as_mut())
                else {
                    return Err(LiveError::NotConnected.into());
                };

                tokio::select! {
                    maybe_chunk = outbound.recv(), if outbound_open => match maybe_chunk {
                        Some(chunk) => match session.send_audio(&chunk).await {
                            Ok(()) => Step::Continue,
                            Err(e) => Step::Fatal(e),
                        },
                        // Capture side gone; keep pumping inbound events —
                        // only the transport decides when the session ends.
                        None => {
                            outbound_open = false;
                            Step::Continue
                        }
                    },
                    event = session.next_event() => match event {
                        Some(Ok(event)) => Step::Event(event),
                        Some(Err(e)) => Step::Fatal(e),
                        None => Step::Closed,
                    },
                }
            };

            match step {
                Step::Continue => {}
                Step::Event(event) => {
                    if let Err(e) = self.dispatch(event).await {
                        self.stop().await;
                        return Err(e);
                    }
                }
                Step::Fatal(e) => {
                    if let Err(handler_err) = self.handler.on_error(&e).await {
                        tracing::warn!(error = %handler_err, "Event handler failed on error");
                    }
                    self.stop().await;
                    return Err(e.into());
                }
                Step::Closed => break,
            }
        }

        self.stop().await;
        Ok(())
    }

    /// Process one inbound event.
    async fn dispatch(&mut self, event: ServerEvent) -> Result<()> {
        match event {
            ServerEvent::AudioDelta { delta, .. } => {
                let buffer = pcm::decode_frame(&delta, PLAYBACK_SAMPLE_RATE, 1);
                if !buffer.is_empty() {
                    self.handler.on_audio(&buffer).await?;
                    if let Some(scheduler) = self.scheduler.as_mut() {
                        scheduler.schedule(buffer);
                    }
                }
            }
            ServerEvent::TextDelta { delta, .. } => {
                self.handler.on_text(&delta).await?;
            }
            ServerEvent::Interrupted { .. } => {
                if let Some(scheduler) = self.scheduler.as_mut() {
                    scheduler.interrupt();
                }
                self.handler.on_interrupted().await?;
            }
            ServerEvent::TurnComplete { .. } => {
                self.handler.on_turn_complete().await?;
            }
            ServerEvent::GoAway { time_left, .. } => {
                tracing::info!(?time_left, "Server announced disconnect");
            }
            ServerEvent::Error { error, .. } => {
                let e = LiveError::server(error.code.unwrap_or_default(), error.message);
                if let Err(handler_err) = self.handler.on_error(&e).await {
                    tracing::warn!(error = %handler_err, "Event handler failed on error");
                }
                return Err(AudioError::from(e));
            }
            ServerEvent::SessionReady { .. } | ServerEvent::Unknown => {}
        }
        Ok(())
    }

    /// Tear the session down.
    ///
    /// Steps run in a fixed order — transport first so no further frames are
    /// produced once closing begins, devices and buffers after — and each
    /// step is independent: a failure is logged and the remaining steps
    /// still run. Calling `stop` twice, or on a never-started conversation,
    /// is a no-op.
    pub async fn stop(&mut self) {
        // (1) close the transport handle
        if let Some(session) = self.session.take() {
            if let Err(e) = session.close().await {
                tracing::warn!(error = %e, "Transport close failed during teardown");
            }
        }

        // (2) stop the capture device, releasing the microphone and stream
        if let Some(mut capture) = self.capture.take() {
            capture.stop();
        }

        // (3) drop the outbound channel; queued frames are discarded
        self.outbound = None;

        // (4)+(5) cancel all scheduled playback and release the output device
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.shutdown();
        }

        if self.state != SessionState::Idle {
            self.state = SessionState::Closed;
            tracing::info!("Conversation closed");
        }
    }
}

impl<S: PlaybackSink, C: OutputClock> Default for Conversation<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

async fn await_ready(session: &dyn colloquy_realtime::LiveSession) -> Result<()> {
    loop {
        match session.next_event().await {
            Some(Ok(ServerEvent::SessionReady { .. })) => return Ok(()),
            Some(Ok(ServerEvent::Error { error, .. })) => {
                return Err(
                    LiveError::server(error.code.unwrap_or_default(), error.message).into()
                );
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
            None => return Err(LiveError::connection("transport closed during setup").into()),
        }
    }
}

async fn close_quietly(session: BoxedSession) {
    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "Transport close failed after aborted start");
    }
}
