use hound::{SampleFormat, WavSpec};

/// Encoder quality. Selects the PCM sample width of the WAV asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderQuality {
    Low,
    Medium,
    High,
}

impl EncoderQuality {
    pub fn bits_per_sample(&self) -> u16 {
        match self {
            EncoderQuality::Low => 8,
            EncoderQuality::Medium => 16,
            EncoderQuality::High => 24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderSettings {
    pub channels: u16,
    pub sample_rate: u32,
    pub quality: EncoderQuality,
}

impl RecorderSettings {
    /// Mono, 12 kHz, medium quality. The only settings the recorder is ever given.
    pub const fn voice_memo() -> Self {
        Self {
            channels: 1,
            sample_rate: 12_000,
            quality: EncoderQuality::Medium,
        }
    }

    pub fn wav_spec(&self) -> WavSpec {
        WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.quality.bits_per_sample(),
            sample_format: SampleFormat::Int,
        }
    }

    /// Scales a float sample in [-1.0, 1.0] to the signed integer range of the
    /// configured sample width.
    pub fn quantize(&self, sample: f32) -> i32 {
        let max = ((1i64 << (self.quality.bits_per_sample() - 1)) - 1) as f32;
        (sample.clamp(-1.0, 1.0) * max).round() as i32
    }
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self::voice_memo()
    }
}
