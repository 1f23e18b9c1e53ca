//! PCM conversion between float sample buffers and the PCM16 wire format.

use std::time::Duration;

/// Sample rate of captured microphone audio sent to the server.
pub const CAPTURE_SAMPLE_RATE: u32 = 16_000;

/// Sample rate of synthesized audio received from the server.
pub const PLAYBACK_SAMPLE_RATE: u32 = 24_000;

/// A decoded floating-point sample buffer.
///
/// Immutable once produced; ownership moves through the pipeline
/// (decoder → scheduler) without sharing.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Interleaved samples in [-1.0, 1.0).
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count (1 = mono).
    pub channels: u16,
}

impl AudioBuffer {
    /// Create a new buffer.
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self { samples, sample_rate, channels }
    }

    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    /// Playback duration of this buffer.
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Encode float samples into little-endian PCM16 bytes.
///
/// Each sample is clamped to [-1.0, 1.0], scaled to the signed 16-bit
/// range, rounded to nearest, and clamped to the representable range so a
/// full-scale positive sample cannot overflow. Total over its input
/// domain — there is no error path.
pub fn encode_frame(samples: &[f32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let scaled = (sample.clamp(-1.0, 1.0) * 32768.0).round();
        let value = scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        data.extend_from_slice(&value.to_le_bytes());
    }
    data
}

/// Decode little-endian PCM16 bytes into a float buffer.
///
/// Each sample is divided by 32768, mapping back into [-1.0, 1.0). An empty
/// payload yields an empty buffer, and a trailing partial sample (odd byte
/// count) is dropped silently — tolerated malformed tail data, not an error.
pub fn decode_frame(payload: &[u8], sample_rate: u32, channels: u16) -> AudioBuffer {
    let mut samples = Vec::with_capacity(payload.len() / 2);
    for pair in payload.chunks_exact(2) {
        let value = i16::from_le_bytes([pair[0], pair[1]]);
        samples.push(value as f32 / 32768.0);
    }
    AudioBuffer::new(samples, sample_rate, channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        let data = encode_frame(&[0.0, 0.5, 1.0, -1.0]);
        assert_eq!(&data[0..2], &0i16.to_le_bytes());
        assert_eq!(&data[2..4], &16384i16.to_le_bytes());
        // Full-scale positive clamps to the largest representable sample.
        assert_eq!(&data[4..6], &32767i16.to_le_bytes());
        assert_eq!(&data[6..8], &(-32768i16).to_le_bytes());
    }

    #[test]
    fn test_encode_clamps_out_of_range() {
        let data = encode_frame(&[2.5, -3.0]);
        assert_eq!(&data[0..2], &32767i16.to_le_bytes());
        assert_eq!(&data[2..4], &(-32768i16).to_le_bytes());
    }

    #[test]
    fn test_decode_empty_payload() {
        let buffer = decode_frame(&[], PLAYBACK_SAMPLE_RATE, 1);
        assert!(buffer.is_empty());
        assert_eq!(buffer.duration(), Duration::ZERO);
    }

    #[test]
    fn test_decode_odd_tail_dropped() {
        // 5 bytes: two full samples plus a dangling byte
        let payload = [0x00, 0x40, 0x00, 0xC0, 0x7F];
        let buffer = decode_frame(&payload, PLAYBACK_SAMPLE_RATE, 1);
        assert_eq!(buffer.samples.len(), 2);
        assert!((buffer.samples[0] - 0.5).abs() < 1e-6);
        assert!((buffer.samples[1] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_buffer_duration() {
        let buffer = AudioBuffer::new(vec![0.0; 24_000], PLAYBACK_SAMPLE_RATE, 1);
        assert_eq!(buffer.duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_buffer_duration_counts_frames_not_samples() {
        let buffer = AudioBuffer::new(vec![0.0; 48_000], PLAYBACK_SAMPLE_RATE, 2);
        assert_eq!(buffer.duration(), Duration::from_secs(1));
    }
}
