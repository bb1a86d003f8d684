//! Session status types and the published status handle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::watch;

use crate::permission::PermissionStatus;
use crate::ui::Controls;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
    Recorded,
    Playing,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Recorded => "recorded",
            Self::Playing => "playing",
        }
    }
}

/// Snapshot published after every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub state: SessionState,
    pub permission: PermissionStatus,
    pub playback_locked: bool,
    pub controls: Controls,
    pub asset_path: PathBuf,
    pub last_recorded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl SessionStatus {
    pub fn initial(asset_path: PathBuf) -> Self {
        let state = SessionState::default();
        let permission = PermissionStatus::default();
        Self {
            state,
            permission,
            playback_locked: false,
            controls: crate::ui::render(state, permission, false),
            asset_path,
            last_recorded_at: None,
            last_error: None,
        }
    }
}

/// Publishes the latest [`SessionStatus`]; readers clone cheaply and never block
/// the controller.
#[derive(Clone)]
pub struct StatusHandle {
    tx: watch::Sender<SessionStatus>,
}

impl StatusHandle {
    pub fn new(initial: SessionStatus) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> SessionStatus {
        self.tx.borrow().clone()
    }

    pub fn publish(&self, status: SessionStatus) {
        self.tx.send_replace(status);
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.tx.subscribe()
    }
}
