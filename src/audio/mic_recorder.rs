//! Microphone capture via cpal, written to the asset with hound.
//!
//! Captures at the device's native configuration, then downmixes and
//! resamples to the recorder settings when the recording is stopped.

use anyhow::{bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use hound::WavWriter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use super::device::{DeviceNotifier, RecorderDevice, RecorderHandle};
use super::resample;
use super::settings::RecorderSettings;

pub struct MicRecorderDevice {
    device_name: Option<String>,
}

impl MicRecorderDevice {
    /// Use the named input device, or the host default when `None`.
    pub fn new(device_name: Option<String>) -> Self {
        Self { device_name }
    }
}

/// Resolve the configured input device, falling back to the host default.
pub fn select_input_device(name: Option<&str>) -> Result<cpal::Device> {
    let host = cpal::default_host();
    match name {
        Some(wanted) => host
            .input_devices()
            .context("Failed to enumerate input devices")?
            .find(|device| device.name().map(|n| n == wanted).unwrap_or(false))
            .with_context(|| format!("Input device '{wanted}' not found")),
        None => host
            .default_input_device()
            .context("No input device available"),
    }
}

impl RecorderDevice for MicRecorderDevice {
    fn acquire(
        &self,
        path: &Path,
        settings: &RecorderSettings,
        notifier: DeviceNotifier,
    ) -> Result<Box<dyn RecorderHandle>> {
        let device = select_input_device(self.device_name.as_deref())?;
        let supported = device
            .default_input_config()
            .context("Failed to query input configuration")?;

        info!(
            "Recorder using device: {} ({} ch, {} Hz, {:?})",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            supported.channels(),
            supported.sample_rate().0,
            supported.sample_format()
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create recording directory")?;
        }
        // Fail acquisition on an unwritable path; the previous take stays
        // intact until the new one is written on stop.
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("Recording file {path:?} is not writable"))?;

        Ok(Box::new(MicRecorder {
            device,
            sample_format: supported.sample_format(),
            config: supported.config(),
            settings: *settings,
            samples: Arc::new(Mutex::new(Vec::new())),
            stream: None,
            path: path.to_path_buf(),
            notifier,
        }))
    }
}

struct MicRecorder {
    device: cpal::Device,
    sample_format: SampleFormat,
    config: cpal::StreamConfig,
    settings: RecorderSettings,
    /// Mono samples at the device rate.
    samples: Arc<Mutex<Vec<f32>>>,
    stream: Option<cpal::Stream>,
    path: PathBuf,
    notifier: DeviceNotifier,
}

/// Seconds of device-rate audio reserved up front so the input callback
/// rarely has to grow the buffer.
const RESERVED_SECONDS: usize = 60;

/// Fold interleaved device frames to mono and append them to `out`.
pub fn downmix_into<T>(out: &mut Vec<f32>, data: &[T], channels: usize)
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = channels.max(1);
    out.extend(data.chunks(channels).map(|frame| {
        frame.iter().map(|s| f32::from_sample(*s)).sum::<f32>() / frame.len() as f32
    }));
}

/// Resample captured mono audio to the recorder settings and write it to
/// `path`, replacing whatever was there. Returns the number of samples written.
pub fn write_asset(
    path: &Path,
    settings: &RecorderSettings,
    captured: &[f32],
    device_rate: u32,
) -> Result<usize> {
    let samples = resample::resample(captured, device_rate, settings.sample_rate);

    let mut writer = WavWriter::create(path, settings.wav_spec())
        .with_context(|| format!("Failed to create recording file {path:?}"))?;
    for &sample in &samples {
        writer.write_sample(settings.quantize(sample))?;
    }
    writer.finalize().context("Failed to finalize recording file")?;

    Ok(samples.len())
}

impl MicRecorder {
    fn build_stream<T>(&self) -> Result<cpal::Stream>
    where
        T: SizedSample,
        f32: FromSample<T>,
    {
        let samples = self.samples.clone();
        let channels = self.config.channels as usize;
        let notifier = self.notifier.clone();
        let err_fn = move |err| {
            error!("Recorder stream error: {}", err);
            notifier.recording_finished(false);
        };

        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                if let Ok(mut samples) = samples.lock() {
                    downmix_into(&mut samples, data, channels);
                }
            },
            err_fn,
            None,
        )?;
        Ok(stream)
    }

    fn take_samples(&self) -> Vec<f32> {
        match self.samples.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl RecorderHandle for MicRecorder {
    fn record(&mut self) -> Result<()> {
        if self.stream.is_some() {
            bail!("Recorder already capturing");
        }

        let stream = match self.sample_format {
            SampleFormat::F32 => self.build_stream::<f32>()?,
            SampleFormat::I16 => self.build_stream::<i16>()?,
            SampleFormat::U16 => self.build_stream::<u16>()?,
            other => bail!("Unsupported input sample format: {other:?}"),
        };

        if let Ok(mut samples) = self.samples.lock() {
            samples.clear();
            samples.reserve(self.config.sample_rate.0 as usize * RESERVED_SECONDS);
        }

        stream.play().context("Failed to start input stream")?;
        self.stream = Some(stream);

        debug!("Recorder capturing for handle {}", self.notifier.handle());
        Ok(())
    }

    fn stop(mut self: Box<Self>) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            debug!("Stopping recorder stream");
            drop(stream);
        }

        let captured = self.take_samples();
        let written = write_asset(
            &self.path,
            &self.settings,
            &captured,
            self.config.sample_rate.0,
        )?;

        info!(
            "Recording saved: {} samples at {} Hz",
            written, self.settings.sample_rate
        );
        Ok(())
    }
}

impl Drop for MicRecorder {
    fn drop(&mut self) {
        if self.stream.is_some() {
            debug!("Dropping active recorder, cleaning up");
            self.stream = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::speaker_player::decode_asset;

    #[test]
    fn test_downmix_into_converts_and_averages_frames() {
        let mut out = vec![0.25];
        downmix_into(&mut out, &[i16::MAX, 0, i16::MIN, i16::MIN], 2);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0], 0.25);
        assert!((out[1] - 0.5).abs() < 1e-3);
        assert_eq!(out[2], -1.0);
    }

    #[test]
    fn test_write_asset_produces_voice_memo_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recording.wav");
        let settings = RecorderSettings::voice_memo();
        let captured = vec![0.5f32; 48_000];

        let written = write_asset(&path, &settings, &captured, 48_000).unwrap();
        assert_eq!(written, 12_000);

        let spec = hound::WavReader::open(&path).unwrap().spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 12_000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);

        let asset = decode_asset(&path).unwrap();
        assert_eq!(asset.samples.len(), 12_000);
        assert!((asset.samples[100] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_write_asset_replaces_previous_take() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recording.wav");
        let settings = RecorderSettings::voice_memo();

        write_asset(&path, &settings, &vec![0.5f32; 24_000], 12_000).unwrap();
        write_asset(&path, &settings, &vec![-0.25f32; 6_000], 12_000).unwrap();

        let asset = decode_asset(&path).unwrap();
        assert_eq!(asset.samples.len(), 6_000);
        assert!(asset.samples.iter().all(|s| (s + 0.25).abs() < 1e-3));
    }
}
