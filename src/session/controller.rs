//! Session controller.
//!
//! Drives the record → stop → play → stop lifecycle:
//!
//! ```text
//! Idle ──record──▶ Recording ──record──▶ Recorded ──play──▶ Playing
//!  ▲                  │  (stop fails /        ▲  ◀──record──┘    │
//!  └──────────────────┘   device failure)     └──play / finished─┘
//! ```
//!
//! All input arrives as [`AppEvent`]s on the main task. The recorder and
//! player handles live inside the phase that uses them, so at most one of
//! each can exist and a handle is always released before the next acquire.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use super::asset::RecordingAsset;
use super::event::AppEvent;
use super::status::{SessionState, SessionStatus, StatusHandle};
use crate::audio::{
    DeviceEvent, DeviceEventKind, DeviceNotifier, HandleId, PlayerDevice, PlayerHandle,
    RecorderDevice, RecorderHandle, RecorderSettings,
};
use crate::error::RecorderError;
use crate::permission::PermissionStatus;
use crate::ui;

enum Phase {
    Idle,
    Recording {
        handle: HandleId,
        recorder: Box<dyn RecorderHandle>,
    },
    Recorded,
    Playing {
        handle: HandleId,
        player: Box<dyn PlayerHandle>,
    },
}

impl Phase {
    fn state(&self) -> SessionState {
        match self {
            Phase::Idle => SessionState::Idle,
            Phase::Recording { .. } => SessionState::Recording,
            Phase::Recorded => SessionState::Recorded,
            Phase::Playing { .. } => SessionState::Playing,
        }
    }
}

pub struct SessionController {
    recorders: Box<dyn RecorderDevice>,
    players: Box<dyn PlayerDevice>,
    asset: RecordingAsset,
    settings: RecorderSettings,
    events: UnboundedSender<AppEvent>,
    status: StatusHandle,
    permission: PermissionStatus,
    phase: Phase,
    /// Set when the player could not be acquired; the play control stays
    /// hidden until a new recording succeeds.
    playback_locked: bool,
    next_handle: u64,
    last_recorded_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl SessionController {
    pub fn new(
        recorders: Box<dyn RecorderDevice>,
        players: Box<dyn PlayerDevice>,
        asset: RecordingAsset,
        events: UnboundedSender<AppEvent>,
        status: StatusHandle,
    ) -> Self {
        let controller = Self {
            recorders,
            players,
            asset,
            settings: RecorderSettings::voice_memo(),
            events,
            status,
            permission: PermissionStatus::Unknown,
            phase: Phase::Idle,
            playback_locked: false,
            next_handle: 0,
            last_recorded_at: None,
            last_error: None,
        };
        controller.publish();
        controller
    }

    pub fn state(&self) -> SessionState {
        self.phase.state()
    }

    pub fn permission(&self) -> PermissionStatus {
        self.permission
    }

    pub fn playback_locked(&self) -> bool {
        self.playback_locked
    }

    pub fn asset(&self) -> &RecordingAsset {
        &self.asset
    }

    pub fn status(&self) -> SessionStatus {
        let state = self.state();
        SessionStatus {
            state,
            permission: self.permission,
            playback_locked: self.playback_locked,
            controls: ui::render(state, self.permission, self.playback_locked),
            asset_path: self.asset.path().to_path_buf(),
            last_recorded_at: self.last_recorded_at,
            last_error: self.last_error.clone(),
        }
    }

    /// Apply one event, publish the re-rendered controls and return the new state.
    pub fn handle(&mut self, event: AppEvent) -> SessionState {
        match event {
            AppEvent::Permission(status) => self.on_permission(status),
            AppEvent::RecordTapped => self.on_record_tapped(),
            AppEvent::PlayTapped => self.on_play_tapped(),
            AppEvent::Device(device_event) => self.on_device_event(device_event),
        }

        self.publish();
        self.state()
    }

    /// Record a startup failure. Permission stays unresolved, so both
    /// controls remain hidden for the rest of the run.
    pub fn setup_failed(&mut self, err: RecorderError) {
        self.diagnose(err);
        self.publish();
    }

    /// Release whatever handle is held. An in-progress recording is kept.
    pub fn shutdown(&mut self) {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Recording { recorder, .. } => {
                info!("Shutting down: finishing in-progress recording");
                self.finish_recording(recorder);
            }
            Phase::Playing { player, .. } => {
                info!("Shutting down: stopping playback");
                player.stop();
                self.phase = Phase::Recorded;
            }
            phase => self.phase = phase,
        }
        self.publish();
    }

    fn on_permission(&mut self, status: PermissionStatus) {
        if self.permission != PermissionStatus::Unknown {
            debug!(
                "Permission already resolved as {}, ignoring {}",
                self.permission.as_str(),
                status.as_str()
            );
            return;
        }

        self.permission = status;
        match status {
            PermissionStatus::Granted => info!("Record permission granted"),
            PermissionStatus::Denied => self.diagnose(RecorderError::PermissionDenied),
            PermissionStatus::Unknown => {}
        }
    }

    fn on_record_tapped(&mut self) {
        if self.permission != PermissionStatus::Granted {
            debug!(
                "Record tapped with permission {}, ignoring",
                self.permission.as_str()
            );
            return;
        }

        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle | Phase::Recorded => self.start_recording(),
            Phase::Recording { recorder, .. } => self.finish_recording(recorder),
            phase @ Phase::Playing { .. } => {
                debug!("Record tapped during playback, ignoring");
                self.phase = phase;
            }
        }
    }

    fn on_play_tapped(&mut self) {
        if self.permission != PermissionStatus::Granted {
            debug!(
                "Play tapped with permission {}, ignoring",
                self.permission.as_str()
            );
            return;
        }

        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Recorded if self.playback_locked => {
                debug!("Play control locked after a failed playback, ignoring");
                self.phase = Phase::Recorded;
            }
            Phase::Recorded => self.start_playback(),
            Phase::Playing { handle, player } => {
                player.stop();
                info!("Playback {} stopped", handle);
                self.phase = Phase::Recorded;
            }
            phase => {
                debug!("Play tapped while {}, ignoring", phase.state().as_str());
                self.phase = phase;
            }
        }
    }

    fn on_device_event(&mut self, event: DeviceEvent) {
        match (std::mem::replace(&mut self.phase, Phase::Idle), event.kind) {
            (
                Phase::Recording { handle, recorder },
                DeviceEventKind::RecordingFinished { success: false },
            ) if handle == event.handle => {
                drop(recorder);
                self.diagnose(RecorderError::DeviceReportedFailure(format!(
                    "recorder {handle} stopped unexpectedly"
                )));
            }
            (Phase::Playing { handle, player }, DeviceEventKind::PlaybackFinished { success })
                if handle == event.handle =>
            {
                player.stop();
                if success {
                    info!("Playback {} finished", handle);
                } else {
                    self.diagnose(RecorderError::DeviceReportedFailure(format!(
                        "player {handle} stopped unexpectedly"
                    )));
                }
                self.phase = Phase::Recorded;
            }
            (phase, kind) => {
                debug!(
                    "Ignoring {:?} from handle {} while {}",
                    kind,
                    event.handle,
                    phase.state().as_str()
                );
                self.phase = phase;
            }
        }
    }

    fn start_recording(&mut self) {
        let handle = self.next_handle_id();
        let notifier = DeviceNotifier::new(handle, self.events.clone());

        let acquired = self
            .recorders
            .acquire(self.asset.path(), &self.settings, notifier)
            .and_then(|mut recorder| {
                recorder.record()?;
                Ok(recorder)
            });

        match acquired {
            Ok(recorder) => {
                info!("Recording {} started: {:?}", handle, self.asset.path());
                self.last_error = None;
                self.phase = Phase::Recording { handle, recorder };
            }
            Err(e) => {
                self.phase = Phase::Idle;
                self.diagnose(RecorderError::RecorderAcquisitionFailed(
                    RecorderError::chain(&e),
                ));
            }
        }
    }

    fn finish_recording(&mut self, recorder: Box<dyn RecorderHandle>) {
        match recorder.stop() {
            Ok(()) => {
                info!("Recording saved to {:?}", self.asset.path());
                self.playback_locked = false;
                self.last_recorded_at = Some(Utc::now());
                self.phase = Phase::Recorded;
            }
            Err(e) => {
                self.phase = Phase::Idle;
                self.diagnose(RecorderError::RecordingFinalizeFailed(RecorderError::chain(
                    &e,
                )));
            }
        }
    }

    fn start_playback(&mut self) {
        let handle = self.next_handle_id();
        let notifier = DeviceNotifier::new(handle, self.events.clone());

        let acquired = self
            .players
            .acquire(self.asset.path(), notifier)
            .and_then(|mut player| {
                player.play()?;
                Ok(player)
            });

        match acquired {
            Ok(player) => {
                info!("Playback {} started", handle);
                self.phase = Phase::Playing { handle, player };
            }
            Err(e) => {
                self.playback_locked = true;
                self.phase = Phase::Recorded;
                self.diagnose(RecorderError::PlaybackAcquisitionFailed(
                    RecorderError::chain(&e),
                ));
            }
        }
    }

    fn next_handle_id(&mut self) -> HandleId {
        self.next_handle += 1;
        HandleId(self.next_handle)
    }

    fn diagnose(&mut self, err: RecorderError) {
        debug!("{}", err);
        self.last_error = Some(err.to_string());
    }

    fn publish(&self) {
        self.status.publish(self.status());
    }
}
