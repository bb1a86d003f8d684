use crate::api::{ApiCommand, ApiServer, ControlsState};
use crate::audio::{CpalAudioSession, MicRecorderDevice, SpeakerPlayerDevice};
use crate::config::Config;
use crate::permission::{CpalPermission, PermissionGate};
use crate::session::{AppEvent, RecordingAsset, SessionController, SessionStatus, StatusHandle};
use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Run the recorder: permission gate, HTTP controls and the session event loop.
///
/// The controller lives on this task only. Everything else (the permission
/// worker, device callbacks, HTTP handlers) reaches it through a channel,
/// so events are handled one at a time in arrival order.
pub async fn run_service() -> Result<()> {
    info!("Starting voice recorder service");

    let config = Config::load()?;
    let asset = RecordingAsset::fixed()?;

    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let (api_tx, mut api_rx) = mpsc::channel::<ApiCommand>(10);
    let status = StatusHandle::new(SessionStatus::initial(asset.path().to_path_buf()));

    let mut controller = SessionController::new(
        Box::new(MicRecorderDevice::new(config.audio.input_device.clone())),
        Box::new(SpeakerPlayerDevice::new(config.audio.output_device.clone())),
        asset,
        tx.clone(),
        status.clone(),
    );

    let audio_session = CpalAudioSession::new(
        config.audio.input_device.clone(),
        config.audio.output_device.clone(),
    );
    let permission = CpalPermission::new(
        config.permission.microphone_access,
        config.audio.input_device.clone(),
    );
    if let Err(e) = PermissionGate::start(&audio_session, &permission, tx) {
        controller.setup_failed(e);
    }

    let api_server = ApiServer::new(ControlsState {
            tx: api_tx,
            status,
        }, &config.api);
    tokio::spawn(async move {
        if let Err(e) = api_server.start().await {
            error!("API server failed: {:#}", e);
        }
    });

    let base_url = config.api.base_url();
    info!("Voice recorder is ready!");
    info!("Record: curl -X POST {}/record", base_url);
    info!("Play:   curl -X POST {}/play", base_url);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => {
                    let state = controller.handle(event);
                    debug!("Handled {:?}, session is {}", event, state.as_str());
                }
                None => break,
            },
            Some(command) = api_rx.recv() => {
                let event = command.event;
                command.apply(&mut controller);
                debug!("Handled {:?} from API", event);
            }
            _ = &mut shutdown => {
                info!("Shutting down");
                break;
            }
        }
    }

    controller.shutdown();
    Ok(())
}
