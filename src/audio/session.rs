//! Process-wide audio session.
//!
//! The session is configured and activated once at startup. There is no
//! teardown; it lives for the rest of the process.

use anyhow::{bail, Context, Result};
use cpal::traits::DeviceTrait;
use std::sync::{Mutex, OnceLock};
use tracing::info;

use super::mic_recorder::select_input_device;
use super::speaker_player::select_output_device;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCategory {
    /// Capture and playback on the same session.
    PlayAndRecord,
}

/// What the process ended up running with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub category: SessionCategory,
    pub host: String,
    pub input_device: String,
    pub output_device: String,
}

pub trait AudioSession {
    fn set_category(&self, category: SessionCategory) -> Result<()>;

    fn set_active(&self, active: bool) -> Result<()>;
}

static ACTIVE_SESSION: OnceLock<ActiveSession> = OnceLock::new();

/// Publish `session` into `slot`. Only the first activation succeeds.
fn activate(slot: &OnceLock<ActiveSession>, session: ActiveSession) -> Result<()> {
    info!(
        "Audio session active: {:?} on {} (in: {}, out: {})",
        session.category, session.host, session.input_device, session.output_device
    );

    if slot.set(session).is_err() {
        bail!("Audio session already active for this process");
    }
    Ok(())
}

/// cpal-backed session. Configuring checks the devices the category needs;
/// activating publishes the process-wide [`ActiveSession`].
pub struct CpalAudioSession {
    input_device: Option<String>,
    output_device: Option<String>,
    pending: Mutex<Option<ActiveSession>>,
}

impl CpalAudioSession {
    pub fn new(input_device: Option<String>, output_device: Option<String>) -> Self {
        Self {
            input_device,
            output_device,
            pending: Mutex::new(None),
        }
    }
}

impl AudioSession for CpalAudioSession {
    fn set_category(&self, category: SessionCategory) -> Result<()> {
        let host = cpal::default_host();
        let input = select_input_device(self.input_device.as_deref())?;
        let output = select_output_device(self.output_device.as_deref())?;

        let session = ActiveSession {
            category,
            host: host.id().name().to_string(),
            input_device: input.name().context("Failed to read input device name")?,
            output_device: output.name().context("Failed to read output device name")?,
        };

        match self.pending.lock() {
            Ok(mut pending) => *pending = Some(session),
            Err(_) => bail!("Audio session state poisoned"),
        }
        Ok(())
    }

    fn set_active(&self, active: bool) -> Result<()> {
        if !active {
            bail!("Audio session deactivation is not supported");
        }

        let session = match self.pending.lock() {
            Ok(mut pending) => pending.take(),
            Err(_) => bail!("Audio session state poisoned"),
        }
        .context("Audio session category not set")?;

        activate(&ACTIVE_SESSION, session)
    }
}
