//! Sample-rate and channel conversion between the device and the asset.
//!
//! Pure functions (no state, no side effects).

/// Average interleaved frames down to one channel.
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Resample audio from one sample rate to another using linear interpolation.
/// Suitable for speech audio where perfect quality isn't critical.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let new_len = (samples.len() as f64 / ratio).ceil() as usize;
    let mut resampled = Vec::with_capacity(new_len);

    for i in 0..new_len {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos as usize;
        let frac = src_pos - src_idx as f64;

        let sample = if src_idx + 1 < samples.len() {
            samples[src_idx] as f64 * (1.0 - frac) + samples[src_idx + 1] as f64 * frac
        } else if src_idx < samples.len() {
            samples[src_idx] as f64
        } else {
            0.0
        };

        resampled.push(sample as f32);
    }

    resampled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_mono_passthrough() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix(&samples, 1), samples);
    }

    #[test]
    fn test_downmix_stereo() {
        let interleaved = vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix(&interleaved, 2), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_resample_same_rate() {
        let samples = vec![1.0, 2.0, 3.0];
        assert_eq!(resample(&samples, 12000, 12000), samples);
    }

    #[test]
    fn test_resample_down_to_voice_memo_rate() {
        // 48kHz to 12kHz (4:1 ratio)
        let samples: Vec<f32> = (0..48).map(|i| i as f32).collect();
        let result = resample(&samples, 48000, 12000);
        assert_eq!(result.len(), 12);
        assert_eq!(result[1], 4.0);
    }

    #[test]
    fn test_resample_up_for_playback() {
        let samples = vec![0.0, 1.0];
        let result = resample(&samples, 12000, 24000);
        assert_eq!(result.len(), 4);
        assert_eq!(result[1], 0.5);
    }

    #[test]
    fn test_resample_empty() {
        assert!(resample(&[], 48000, 12000).is_empty());
    }
}
