//! Failures of a record/playback attempt.
//!
//! Every variant is terminal for the attempt that produced it. The controller
//! reverts to the nearest safe state and logs the message at debug level.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Audio session configuration failed: {0}")]
    SessionConfigurationFailed(String),

    #[error("Failed to acquire recorder: {0}")]
    RecorderAcquisitionFailed(String),

    #[error("Failed to finalize recording: {0}")]
    RecordingFinalizeFailed(String),

    #[error("Failed to acquire player: {0}")]
    PlaybackAcquisitionFailed(String),

    #[error("Audio device reported failure: {0}")]
    DeviceReportedFailure(String),
}

impl RecorderError {
    /// Flattens an `anyhow` chain into the variant's message.
    pub(crate) fn chain(err: &anyhow::Error) -> String {
        format!("{err:#}")
    }
}
