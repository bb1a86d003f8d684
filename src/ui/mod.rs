//! Maps session state to the two on-screen controls.
//!
//! Purely derived; nothing here holds state.

use serde::{Deserialize, Serialize};

use crate::permission::PermissionStatus;
use crate::session::SessionState;

pub const TAP_TO_RECORD: &str = "Tap to record";
pub const TAP_TO_STOP: &str = "Tap to stop";
pub const TAP_TO_RE_RECORD: &str = "Tap to re-record";
pub const PLAY_RECORDING: &str = "Play your recording";
pub const STOP_PLAYBACK: &str = "Stop playback";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub label: String,
    pub visible: bool,
}

impl Control {
    fn shown(label: &str) -> Self {
        Self {
            label: label.to_string(),
            visible: true,
        }
    }

    fn hidden(label: &str) -> Self {
        Self {
            label: label.to_string(),
            visible: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub record: Control,
    pub play: Control,
}

pub fn render(state: SessionState, permission: PermissionStatus, playback_locked: bool) -> Controls {
    if permission != PermissionStatus::Granted {
        return Controls {
            record: Control::hidden(TAP_TO_RECORD),
            play: Control::hidden(PLAY_RECORDING),
        };
    }

    match state {
        SessionState::Idle => Controls {
            record: Control::shown(TAP_TO_RECORD),
            play: Control::hidden(PLAY_RECORDING),
        },
        SessionState::Recording => Controls {
            record: Control::shown(TAP_TO_STOP),
            play: Control::hidden(PLAY_RECORDING),
        },
        SessionState::Recorded => Controls {
            record: Control::shown(TAP_TO_RE_RECORD),
            play: if playback_locked {
                Control::hidden(PLAY_RECORDING)
            } else {
                Control::shown(PLAY_RECORDING)
            },
        },
        SessionState::Playing => Controls {
            record: Control::shown(TAP_TO_RE_RECORD),
            play: Control::shown(STOP_PLAYBACK),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [SessionState; 4] = [
        SessionState::Idle,
        SessionState::Recording,
        SessionState::Recorded,
        SessionState::Playing,
    ];

    #[test]
    fn test_nothing_visible_without_permission() {
        for permission in [PermissionStatus::Unknown, PermissionStatus::Denied] {
            for state in ALL_STATES {
                let controls = render(state, permission, false);
                assert!(!controls.record.visible, "{state:?} {permission:?}");
                assert!(!controls.play.visible, "{state:?} {permission:?}");
            }
        }
    }

    #[test]
    fn test_idle() {
        let controls = render(SessionState::Idle, PermissionStatus::Granted, false);
        assert_eq!(controls.record, Control::shown(TAP_TO_RECORD));
        assert!(!controls.play.visible);
    }

    #[test]
    fn test_recording() {
        let controls = render(SessionState::Recording, PermissionStatus::Granted, false);
        assert_eq!(controls.record, Control::shown(TAP_TO_STOP));
        assert!(!controls.play.visible);
    }

    #[test]
    fn test_recorded() {
        let controls = render(SessionState::Recorded, PermissionStatus::Granted, false);
        assert_eq!(controls.record, Control::shown(TAP_TO_RE_RECORD));
        assert_eq!(controls.play, Control::shown(PLAY_RECORDING));
    }

    #[test]
    fn test_recorded_with_locked_playback() {
        let controls = render(SessionState::Recorded, PermissionStatus::Granted, true);
        assert_eq!(controls.record, Control::shown(TAP_TO_RE_RECORD));
        assert!(!controls.play.visible);
    }

    #[test]
    fn test_playing() {
        let controls = render(SessionState::Playing, PermissionStatus::Granted, false);
        assert_eq!(controls.record, Control::shown(TAP_TO_RE_RECORD));
        assert_eq!(controls.play, Control::shown(STOP_PLAYBACK));
    }
}
