//! Audio format definitions and wire payload utilities.

use serde::{Deserialize, Serialize};

/// Complete audio format specification for a wire payload.
///
/// The Live API speaks raw little-endian 16-bit PCM in both directions:
/// 16 kHz mono for captured input, 24 kHz mono for synthesized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate in Hz (e.g., 24000, 16000).
    pub sample_rate: u32,
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Bits per sample.
    pub bits_per_sample: u8,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::capture()
    }
}

impl AudioFormat {
    /// Create a new audio format specification.
    pub fn new(sample_rate: u32, channels: u16, bits_per_sample: u8) -> Self {
        Self { sample_rate, channels, bits_per_sample }
    }

    /// PCM16 format at 16kHz mono (Live API input).
    pub fn capture() -> Self {
        Self { sample_rate: 16_000, channels: 1, bits_per_sample: 16 }
    }

    /// PCM16 format at 24kHz mono (Live API output).
    pub fn playback() -> Self {
        Self { sample_rate: 24_000, channels: 1, bits_per_sample: 16 }
    }

    /// Mime tag declared alongside the payload on the wire.
    pub fn mime_type(&self) -> String {
        format!("audio/pcm;rate={}", self.sample_rate)
    }

    /// Calculate bytes per second for this format.
    pub fn bytes_per_second(&self) -> u32 {
        self.sample_rate * self.channels as u32 * (self.bits_per_sample / 8) as u32
    }

    /// Calculate duration in milliseconds for a given number of bytes.
    pub fn duration_ms(&self, bytes: usize) -> f64 {
        let bytes_per_ms = self.bytes_per_second() as f64 / 1000.0;
        bytes as f64 / bytes_per_ms
    }
}

/// An encoded audio payload with format information.
///
/// Produced once by the encoder side and consumed once by the transport;
/// nothing retains ownership after send.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Raw audio data (little-endian PCM16).
    pub data: Vec<u8>,
    /// Audio format of this chunk.
    pub format: AudioFormat,
}

impl AudioChunk {
    /// Create a new audio chunk.
    pub fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// Create a 16kHz capture-format chunk.
    pub fn capture(data: Vec<u8>) -> Self {
        Self::new(data, AudioFormat::capture())
    }

    /// Create a 24kHz playback-format chunk.
    pub fn playback(data: Vec<u8>) -> Self {
        Self::new(data, AudioFormat::playback())
    }

    /// Get duration of this audio chunk in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.format.duration_ms(self.data.len())
    }

    /// Encode audio data as base64.
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Decode audio data from base64.
    pub fn from_base64(encoded: &str, format: AudioFormat) -> Result<Self, base64::DecodeError> {
        use base64::Engine;
        let data = base64::engine::general_purpose::STANDARD.decode(encoded)?;
        Ok(Self::new(data, format))
    }

    /// Create an AudioChunk from i16 samples (converts to PCM16 little-endian bytes).
    pub fn from_i16_samples(samples: &[i16], format: AudioFormat) -> Self {
        let mut data = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            data.extend_from_slice(&sample.to_le_bytes());
        }
        Self::new(data, format)
    }

    /// Convert the audio data to a vector of i16 samples.
    ///
    /// A trailing partial sample (odd byte count) is dropped silently.
    pub fn to_i16_samples(&self) -> Vec<i16> {
        let mut samples = Vec::with_capacity(self.data.len() / 2);
        for pair in self.data.chunks_exact(2) {
            samples.push(i16::from_le_bytes([pair[0], pair[1]]));
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_format_bytes_per_second() {
        assert_eq!(AudioFormat::playback().bytes_per_second(), 48000); // 24000 * 1 * 2
        assert_eq!(AudioFormat::capture().bytes_per_second(), 32000); // 16000 * 1 * 2
    }

    #[test]
    fn test_audio_format_duration() {
        let format = AudioFormat::playback();
        // 48000 bytes = 1 second
        let duration = format.duration_ms(48000);
        assert!((duration - 1000.0).abs() < 0.001);
    }

    #[test]
    fn test_mime_type_carries_rate() {
        assert_eq!(AudioFormat::capture().mime_type(), "audio/pcm;rate=16000");
        assert_eq!(AudioFormat::playback().mime_type(), "audio/pcm;rate=24000");
    }

    #[test]
    fn test_audio_chunk_base64() {
        let original = AudioChunk::playback(vec![0, 1, 2, 3, 4, 5]);
        let encoded = original.to_base64();
        let decoded = AudioChunk::from_base64(&encoded, AudioFormat::playback()).unwrap();
        assert_eq!(original.data, decoded.data);
    }

    #[test]
    fn test_i16_samples_roundtrip() {
        let samples: Vec<i16> = vec![0, 1, -1, 32767, -32768, 1000, -1000];
        let chunk = AudioChunk::from_i16_samples(&samples, AudioFormat::playback());
        assert_eq!(chunk.to_i16_samples(), samples);
    }

    #[test]
    fn test_i16_samples_odd_tail_dropped() {
        let chunk = AudioChunk::playback(vec![0x34, 0x12, 0xFF]); // 3 bytes: one sample + tail
        assert_eq!(chunk.to_i16_samples(), vec![0x1234]);
    }
}
