//! Permission gate: one-time audio session setup and microphone access.
//!
//! The gate configures the shared audio session for play-and-record,
//! activates it, then asks for record permission. The answer arrives on an
//! arbitrary thread and is posted into the main event loop as
//! [`AppEvent::Permission`]; it never touches session state directly.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::audio::mic_recorder::select_input_device;
use crate::audio::{AudioSession, SessionCategory};
use crate::error::RecorderError;
use crate::session::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn from_allowed(allowed: bool) -> Self {
        if allowed {
            Self::Granted
        } else {
            Self::Denied
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

pub type PermissionCallback = Box<dyn FnOnce(bool) + Send + 'static>;

pub trait PermissionProvider {
    /// Ask for record permission. `callback` runs exactly once, on any thread.
    fn request_record_permission(&self, callback: PermissionCallback);
}

/// Desktop stand-in for the system microphone prompt.
///
/// Access is granted when it is enabled in config and the input device can
/// actually be opened for capture. The probe runs on the blocking pool.
pub struct CpalPermission {
    microphone_access: bool,
    input_device: Option<String>,
}

impl CpalPermission {
    pub fn new(microphone_access: bool, input_device: Option<String>) -> Self {
        Self {
            microphone_access,
            input_device,
        }
    }
}

impl PermissionProvider for CpalPermission {
    fn request_record_permission(&self, callback: PermissionCallback) {
        if !self.microphone_access {
            debug!("Microphone access disabled in config");
            callback(false);
            return;
        }

        let input_device = self.input_device.clone();
        tokio::task::spawn_blocking(move || {
            let allowed = match probe_input(input_device.as_deref()) {
                Ok(()) => true,
                Err(e) => {
                    debug!("Microphone probe failed: {:#}", e);
                    false
                }
            };
            callback(allowed);
        });
    }
}

fn probe_input(name: Option<&str>) -> anyhow::Result<()> {
    use cpal::traits::DeviceTrait;

    let device = select_input_device(name)?;
    device.default_input_config()?;
    Ok(())
}

pub struct PermissionGate;

impl PermissionGate {
    /// Configure and activate the audio session, then request permission.
    ///
    /// A configuration failure is returned and nothing is requested; the
    /// caller leaves the record control hidden for the rest of the run.
    pub fn start(
        session: &dyn AudioSession,
        provider: &dyn PermissionProvider,
        events: UnboundedSender<AppEvent>,
    ) -> Result<(), RecorderError> {
        session
            .set_category(SessionCategory::PlayAndRecord)
            .and_then(|_| session.set_active(true))
            .map_err(|e| RecorderError::SessionConfigurationFailed(RecorderError::chain(&e)))?;

        info!("Requesting record permission");
        provider.request_record_permission(Box::new(move |allowed| {
            let status = PermissionStatus::from_allowed(allowed);
            if events.send(AppEvent::Permission(status)).is_err() {
                debug!("Event loop gone, dropping permission result");
            }
        }));

        Ok(())
    }
}
