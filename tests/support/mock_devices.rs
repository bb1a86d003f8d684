//! In-memory stand-ins for the capture/playback devices.
//!
//! The recorder writes a "take N" marker to the asset path on stop; the
//! player reads the asset when acquired, so tests can see which take a
//! playback would have heard.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use voice_recorder::audio::{
    DeviceNotifier, PlayerDevice, PlayerHandle, RecorderDevice, RecorderHandle, RecorderSettings,
};

#[derive(Default)]
pub struct DeviceLog {
    pub fail_recorder_acquire: bool,
    pub fail_record_start: bool,
    pub fail_finalize: bool,
    pub fail_player_acquire: bool,
    pub takes: u32,
    pub live_recorders: usize,
    pub live_players: usize,
    pub max_live_recorders: usize,
    pub max_live_players: usize,
    pub recorded_paths: Vec<PathBuf>,
    pub played: Vec<String>,
    pub notifiers: Vec<DeviceNotifier>,
}

#[derive(Clone, Default)]
pub struct MockDevices {
    pub log: Arc<Mutex<DeviceLog>>,
}

impl MockDevices {
    pub fn recorders(&self) -> Box<dyn RecorderDevice> {
        Box::new(MockRecorderDevice(self.log.clone()))
    }

    pub fn players(&self) -> Box<dyn PlayerDevice> {
        Box::new(MockPlayerDevice(self.log.clone()))
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut DeviceLog) -> R) -> R {
        f(&mut self.log.lock().unwrap())
    }

    pub fn last_notifier(&self) -> DeviceNotifier {
        self.with(|log| log.notifiers.last().cloned().expect("no device acquired"))
    }
}

struct MockRecorderDevice(Arc<Mutex<DeviceLog>>);

struct MockRecorder {
    log: Arc<Mutex<DeviceLog>>,
    path: PathBuf,
}

impl RecorderDevice for MockRecorderDevice {
    fn acquire(
        &self,
        path: &Path,
        settings: &RecorderSettings,
        notifier: DeviceNotifier,
    ) -> Result<Box<dyn RecorderHandle>> {
        assert_eq!(*settings, RecorderSettings::voice_memo());

        let mut log = self.0.lock().unwrap();
        if log.fail_recorder_acquire {
            return Err(anyhow!("no input device"));
        }
        log.live_recorders += 1;
        log.max_live_recorders = log.max_live_recorders.max(log.live_recorders);
        log.recorded_paths.push(path.to_path_buf());
        log.notifiers.push(notifier);

        Ok(Box::new(MockRecorder {
            log: self.0.clone(),
            path: path.to_path_buf(),
        }))
    }
}

impl RecorderHandle for MockRecorder {
    fn record(&mut self) -> Result<()> {
        if self.log.lock().unwrap().fail_record_start {
            return Err(anyhow!("input stream refused to start"));
        }
        Ok(())
    }

    fn stop(self: Box<Self>) -> Result<()> {
        let take = {
            let mut log = self.log.lock().unwrap();
            if log.fail_finalize {
                return Err(anyhow!("disk full"));
            }
            log.takes += 1;
            log.takes
        };
        std::fs::write(&self.path, format!("take {take}")).context("write asset")?;
        Ok(())
    }
}

impl Drop for MockRecorder {
    fn drop(&mut self) {
        self.log.lock().unwrap().live_recorders -= 1;
    }
}

struct MockPlayerDevice(Arc<Mutex<DeviceLog>>);

struct MockPlayer {
    log: Arc<Mutex<DeviceLog>>,
}

impl PlayerDevice for MockPlayerDevice {
    fn acquire(&self, path: &Path, notifier: DeviceNotifier) -> Result<Box<dyn PlayerHandle>> {
        let mut log = self.0.lock().unwrap();
        if log.fail_player_acquire {
            return Err(anyhow!("unreadable recording"));
        }
        let contents = std::fs::read_to_string(path).context("open asset")?;
        log.played.push(contents);
        log.live_players += 1;
        log.max_live_players = log.max_live_players.max(log.live_players);
        log.notifiers.push(notifier);

        Ok(Box::new(MockPlayer {
            log: self.0.clone(),
        }))
    }
}

impl PlayerHandle for MockPlayer {
    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(self: Box<Self>) {}
}

impl Drop for MockPlayer {
    fn drop(&mut self) {
        self.log.lock().unwrap().live_players -= 1;
    }
}
