//! Microphone capture seam.

use crate::error::Result;

/// Callback receiving one fixed-size block of captured samples.
///
/// Invoked at the cadence of the underlying device's processing block size —
/// the device driver, not application polling, is the producer. The handler
/// must not block: it runs on the audio thread (or an equivalent hot path)
/// and anything slow belongs on the far side of a channel.
pub type FrameHandler = Box<dyn FnMut(&[f32]) + Send + 'static>;

/// A source of captured microphone audio.
///
/// One source owns one device handle. Frames are mono float samples at
/// [`sample_rate`](Self::sample_rate); delivery starts with
/// [`start`](Self::start) and continues until [`stop`](Self::stop).
pub trait CaptureSource {
    /// Sample rate of delivered frames, in Hz.
    fn sample_rate(&self) -> u32;

    /// Acquire the device and begin delivering frames to `handler`.
    ///
    /// Acquisition failure (permission denied, no device) leaves the source
    /// unstarted with nothing held.
    fn start(&mut self, handler: FrameHandler) -> Result<()>;

    /// Stop delivery and release the device and its stream.
    ///
    /// Must be safe to call repeatedly and on a never-started source.
    /// Skipping this leaks the microphone indicator/permission in the host
    /// environment, so every teardown path calls it.
    fn stop(&mut self);
}
