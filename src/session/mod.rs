//! Record/playback session: the state machine that owns the recorder and
//! player handles, and the status it publishes after every transition.

pub mod asset;
pub mod controller;
pub mod event;
pub mod status;

pub use asset::RecordingAsset;
pub use controller::SessionController;
pub use event::AppEvent;
pub use status::{SessionState, SessionStatus, StatusHandle};
