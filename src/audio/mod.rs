pub mod device;
pub mod mic_recorder;
pub mod resample;
pub mod session;
pub mod settings;
pub mod speaker_player;

pub use device::{
    DeviceEvent, DeviceEventKind, DeviceNotifier, HandleId, PlayerDevice, PlayerHandle,
    RecorderDevice, RecorderHandle,
};
pub use mic_recorder::MicRecorderDevice;
pub use session::{AudioSession, CpalAudioSession, SessionCategory};
pub use settings::{EncoderQuality, RecorderSettings};
pub use speaker_player::SpeakerPlayerDevice;
