use crate::audio::DeviceEvent;
use crate::permission::PermissionStatus;

/// Everything the main event loop feeds to the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The permission request resolved.
    Permission(PermissionStatus),
    /// The record control was tapped.
    RecordTapped,
    /// The play control was tapped.
    PlayTapped,
    /// A device handle reported completion.
    Device(DeviceEvent),
}
