//! Desktop audio I/O backed by cpal.
//!
//! Available behind the `desktop-audio` feature. The capture source owns
//! the microphone stream; the playback sink owns the output stream and a
//! sample-counter clock so scheduling happens on the device's own timeline
//! rather than wall time.

use crate::capture::{CaptureSource, FrameHandler};
use crate::error::{AudioError, Result};
use crate::pcm::{AudioBuffer, CAPTURE_SAMPLE_RATE, PLAYBACK_SAMPLE_RATE};
use crate::scheduler::{OutputClock, PlaybackId, PlaybackSink};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Microphone capture via the host's default input device.
pub struct CpalCaptureSource {
    sample_rate: u32,
    stream: Option<cpal::Stream>,
}

impl CpalCaptureSource {
    /// Create an unstarted source at the Live API capture rate (16kHz).
    pub fn new() -> Self {
        Self { sample_rate: CAPTURE_SAMPLE_RATE, stream: None }
    }
}

impl Default for CpalCaptureSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSource for CpalCaptureSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn start(&mut self, mut handler: FrameHandler) -> Result<()> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| AudioError::device("no default input device"))?;

        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(self.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| handler(data),
                |err| tracing::warn!(error = %err, "Capture stream error"),
                None,
            )
            .map_err(|e| AudioError::stream(format!("failed to build input stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| AudioError::stream(format!("failed to start input stream: {}", e)))?;

        self.stream = Some(stream);
        tracing::info!(sample_rate = self.sample_rate, "Microphone capture started");
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                tracing::warn!(error = %e, "Capture stream pause failed");
            }
            // Dropping the stream releases the device handle and with it the
            // host's microphone indicator.
            drop(stream);
            tracing::info!("Microphone capture stopped");
        }
    }
}

// One buffer committed to the output timeline.
struct Segment {
    id: PlaybackId,
    start_sample: u64,
    cursor: usize,
    samples: Vec<f32>,
}

/// Scheduled playback via the host's default output device.
///
/// Buffers are mixed by the device callback: each one starts at its
/// committed sample position on the shared sample counter, which also
/// backs the paired [`SampleClock`].
pub struct CpalPlaybackSink {
    segments: Arc<Mutex<Vec<Segment>>>,
    position: Arc<AtomicU64>,
    sample_rate: u32,
    stream: Option<cpal::Stream>,
}

/// Output-device clock counting played samples.
#[derive(Clone)]
pub struct SampleClock {
    position: Arc<AtomicU64>,
    sample_rate: u32,
}

impl OutputClock for SampleClock {
    fn now(&self) -> Duration {
        Duration::from_secs_f64(
            self.position.load(Ordering::Relaxed) as f64 / self.sample_rate as f64,
        )
    }
}

impl CpalPlaybackSink {
    /// Open the default output device at the Live API playback rate (24kHz).
    ///
    /// Returns the sink together with the clock over its sample counter.
    pub fn open() -> Result<(Self, SampleClock)> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AudioError::device("no default output device"))?;

        let channels = device
            .default_output_config()
            .map_err(|e| AudioError::device(format!("no default output config: {}", e)))?
            .channels();

        let config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(PLAYBACK_SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Default,
        };

        let segments: Arc<Mutex<Vec<Segment>>> = Arc::new(Mutex::new(Vec::new()));
        let position = Arc::new(AtomicU64::new(0));

        let cb_segments = Arc::clone(&segments);
        let cb_position = Arc::clone(&position);
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut segments = cb_segments.lock();
                    let mut pos = cb_position.load(Ordering::Relaxed);
                    for frame in data.chunks_mut(channels as usize) {
                        let mut mixed = 0.0f32;
                        for segment in segments.iter_mut() {
                            if segment.start_sample <= pos {
                                if let Some(&sample) = segment.samples.get(segment.cursor) {
                                    mixed += sample;
                                    segment.cursor += 1;
                                }
                            }
                        }
                        let sample = mixed.clamp(-1.0, 1.0);
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                        pos += 1;
                    }
                    segments.retain(|s| s.cursor < s.samples.len());
                    cb_position.store(pos, Ordering::Relaxed);
                },
                |err| tracing::warn!(error = %err, "Playback stream error"),
                None,
            )
            .map_err(|e| AudioError::stream(format!("failed to build output stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| AudioError::stream(format!("failed to start output stream: {}", e)))?;

        let clock = SampleClock { position: Arc::clone(&position), sample_rate: PLAYBACK_SAMPLE_RATE };
        let sink = Self { segments, position, sample_rate: PLAYBACK_SAMPLE_RATE, stream: Some(stream) };
        Ok((sink, clock))
    }

    /// A clock over this sink's sample counter.
    pub fn clock(&self) -> SampleClock {
        SampleClock { position: Arc::clone(&self.position), sample_rate: self.sample_rate }
    }
}

impl PlaybackSink for CpalPlaybackSink {
    fn begin(&mut self, id: PlaybackId, buffer: AudioBuffer, at: Duration) {
        // Inbound live audio is mono; multi-channel fan-out happens in the
        // device callback.
        let start_sample = (at.as_secs_f64() * self.sample_rate as f64).round() as u64;
        self.segments.lock().push(Segment {
            id,
            start_sample,
            cursor: 0,
            samples: buffer.samples,
        });
    }

    fn cancel(&mut self, id: PlaybackId) {
        self.segments.lock().retain(|s| s.id != id);
    }

    fn shutdown(&mut self) {
        self.segments.lock().clear();
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                tracing::warn!(error = %e, "Playback stream pause failed");
            }
            drop(stream);
            tracing::info!("Output device released");
        }
    }
}

/// Open both desktop devices for one conversation.
pub fn desktop_io() -> Result<(CpalCaptureSource, CpalPlaybackSink, SampleClock)> {
    let capture = CpalCaptureSource::new();
    let (sink, clock) = CpalPlaybackSink::open()?;
    Ok((capture, sink, clock))
}
