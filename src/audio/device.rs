//! Device collaborators for capture and playback.
//!
//! The session controller only ever talks to these traits. Completion is
//! never delivered by calling back into the controller: devices post a
//! [`DeviceEvent`] through their [`DeviceNotifier`] and the event loop feeds
//! it to the controller on the main task.

use anyhow::Result;
use std::fmt;
use std::path::Path;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::settings::RecorderSettings;
use crate::session::AppEvent;

/// Identifies one acquired device handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEventKind {
    RecordingFinished { success: bool },
    PlaybackFinished { success: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceEvent {
    pub handle: HandleId,
    pub kind: DeviceEventKind,
}

/// Posts completion events for a single handle into the main event loop.
#[derive(Clone)]
pub struct DeviceNotifier {
    handle: HandleId,
    tx: UnboundedSender<AppEvent>,
}

impl DeviceNotifier {
    pub fn new(handle: HandleId, tx: UnboundedSender<AppEvent>) -> Self {
        Self { handle, tx }
    }

    pub fn handle(&self) -> HandleId {
        self.handle
    }

    pub fn recording_finished(&self, success: bool) {
        self.post(DeviceEventKind::RecordingFinished { success });
    }

    pub fn playback_finished(&self, success: bool) {
        self.post(DeviceEventKind::PlaybackFinished { success });
    }

    fn post(&self, kind: DeviceEventKind) {
        let event = AppEvent::Device(DeviceEvent {
            handle: self.handle,
            kind,
        });
        if self.tx.send(event).is_err() {
            debug!("Event loop gone, dropping {:?} for handle {}", kind, self.handle);
        }
    }
}

/// An acquired recorder bound to the asset path.
pub trait RecorderHandle {
    /// Begin capturing.
    fn record(&mut self) -> Result<()>;

    /// Stop capturing, write the asset, and release the device.
    fn stop(self: Box<Self>) -> Result<()>;
}

/// An acquired player loaded from the asset path.
pub trait PlayerHandle {
    /// Begin playback.
    fn play(&mut self) -> Result<()>;

    /// Stop playback and release the device.
    fn stop(self: Box<Self>);
}

pub trait RecorderDevice {
    fn acquire(
        &self,
        path: &Path,
        settings: &RecorderSettings,
        notifier: DeviceNotifier,
    ) -> Result<Box<dyn RecorderHandle>>;
}

pub trait PlayerDevice {
    fn acquire(&self, path: &Path, notifier: DeviceNotifier) -> Result<Box<dyn PlayerHandle>>;
}
