//! Playback of the asset through a cpal output stream.

use anyhow::{bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample};
use hound::WavReader;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::device::{DeviceNotifier, PlayerDevice, PlayerHandle};
use super::resample;

pub struct SpeakerPlayerDevice {
    device_name: Option<String>,
}

impl SpeakerPlayerDevice {
    /// Use the named output device, or the host default when `None`.
    pub fn new(device_name: Option<String>) -> Self {
        Self { device_name }
    }
}

/// Resolve the configured output device, falling back to the host default.
pub fn select_output_device(name: Option<&str>) -> Result<cpal::Device> {
    let host = cpal::default_host();
    match name {
        Some(wanted) => host
            .output_devices()
            .context("Failed to enumerate output devices")?
            .find(|device| device.name().map(|n| n == wanted).unwrap_or(false))
            .with_context(|| format!("Output device '{wanted}' not found")),
        None => host
            .default_output_device()
            .context("No output device available"),
    }
}

/// Decoded asset contents as mono floats.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAsset {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Read a PCM WAV file and fold it to mono floats in [-1.0, 1.0].
pub fn decode_asset(path: &Path) -> Result<DecodedAsset> {
    let reader =
        WavReader::open(path).with_context(|| format!("Failed to open recording {path:?}"))?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to read recording samples")?
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read recording samples")?,
    };

    Ok(DecodedAsset {
        samples: resample::downmix(&interleaved, spec.channels as usize),
        sample_rate: spec.sample_rate,
    })
}

impl PlayerDevice for SpeakerPlayerDevice {
    fn acquire(&self, path: &Path, notifier: DeviceNotifier) -> Result<Box<dyn PlayerHandle>> {
        let asset = decode_asset(path)?;

        let device = select_output_device(self.device_name.as_deref())?;
        let supported = device
            .default_output_config()
            .context("Failed to query output configuration")?;
        let config = supported.config();

        let samples = resample::resample(&asset.samples, asset.sample_rate, config.sample_rate.0);

        info!(
            "Player using device: {} ({} samples from {} Hz to {} Hz)",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            asset.samples.len(),
            asset.sample_rate,
            config.sample_rate.0
        );

        Ok(Box::new(SpeakerPlayer {
            device,
            sample_format: supported.sample_format(),
            config,
            samples: Arc::new(samples),
            stream: None,
            notifier,
        }))
    }
}

struct SpeakerPlayer {
    device: cpal::Device,
    sample_format: SampleFormat,
    config: cpal::StreamConfig,
    samples: Arc<Vec<f32>>,
    stream: Option<cpal::Stream>,
    notifier: DeviceNotifier,
}

impl SpeakerPlayer {
    fn build_stream<T>(&self) -> Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let samples = self.samples.clone();
        let channels = self.config.channels as usize;
        let mut cursor = 0usize;
        let mut finished = false;

        let done = self.notifier.clone();
        let failed = self.notifier.clone();
        let err_fn = move |err| {
            error!("Player stream error: {}", err);
            failed.playback_finished(false);
        };

        let stream = self.device.build_output_stream(
            &self.config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let value = samples.get(cursor).copied().unwrap_or(0.0);
                    cursor += 1;
                    for out in frame.iter_mut() {
                        *out = T::from_sample(value);
                    }
                }
                if !finished && cursor >= samples.len() {
                    finished = true;
                    done.playback_finished(true);
                }
            },
            err_fn,
            None,
        )?;
        Ok(stream)
    }
}

impl PlayerHandle for SpeakerPlayer {
    fn play(&mut self) -> Result<()> {
        if self.stream.is_some() {
            bail!("Player already playing");
        }

        let stream = match self.sample_format {
            SampleFormat::F32 => self.build_stream::<f32>()?,
            SampleFormat::I16 => self.build_stream::<i16>()?,
            SampleFormat::U16 => self.build_stream::<u16>()?,
            other => bail!("Unsupported output sample format: {other:?}"),
        };

        stream.play().context("Failed to start output stream")?;
        self.stream = Some(stream);

        debug!("Player started for handle {}", self.notifier.handle());
        Ok(())
    }

    fn stop(mut self: Box<Self>) {
        if let Some(stream) = self.stream.take() {
            debug!("Stopping player stream");
            drop(stream);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::settings::RecorderSettings;
    use hound::WavWriter;

    #[test]
    fn test_decode_asset_reads_voice_memo_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recording.wav");
        let settings = RecorderSettings::voice_memo();

        let mut writer = WavWriter::create(&path, settings.wav_spec()).unwrap();
        for sample in [0.0f32, 0.5, -0.5, 1.0] {
            writer.write_sample(settings.quantize(sample)).unwrap();
        }
        writer.finalize().unwrap();

        let asset = decode_asset(&path).unwrap();
        assert_eq!(asset.sample_rate, 12_000);
        assert_eq!(asset.samples.len(), 4);
        assert!((asset.samples[1] - 0.5).abs() < 1e-3);
        assert!((asset.samples[2] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_decode_asset_downmixes_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };

        let mut writer = WavWriter::create(&path, spec).unwrap();
        for sample in [1.0f32, 0.0, 0.25, 0.75] {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        let asset = decode_asset(&path).unwrap();
        assert_eq!(asset.sample_rate, 44_100);
        assert_eq!(asset.samples, vec![0.5, 0.5]);
    }

    #[test]
    fn test_decode_missing_asset_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(decode_asset(&dir.path().join("recording.wav")).is_err());
    }
}
