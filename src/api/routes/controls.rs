//! Record/play control endpoints.
//!
//! Provides HTTP endpoints for:
//! - Tapping the record control (POST /record)
//! - Tapping the play control (POST /play)
//! - Getting the rendered controls (GET /status)

use crate::api::error::{ApiError, ApiResult};
use crate::session::{AppEvent, SessionController, SessionStatus, StatusHandle};
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

/// A tap forwarded to the event loop, answered with the status it produced.
pub struct ApiCommand {
    pub event: AppEvent,
    pub reply: oneshot::Sender<SessionStatus>,
}

impl ApiCommand {
    pub fn new(event: AppEvent) -> (Self, oneshot::Receiver<SessionStatus>) {
        let (reply, rx) = oneshot::channel();
        (Self { event, reply }, rx)
    }

    /// Hand the tap to the controller and reply with the resulting status.
    pub fn apply(self, controller: &mut SessionController) {
        controller.handle(self.event);
        if self.reply.send(controller.status()).is_err() {
            debug!("Caller went away before {:?} was answered", self.event);
        }
    }
}

#[derive(Clone)]
pub struct ControlsState {
    pub tx: mpsc::Sender<ApiCommand>,
    pub status: StatusHandle,
}

/// Creates the controls router with the record/play/status endpoints.
pub fn router(state: ControlsState) -> Router {
    Router::new()
        .route("/record", post(tap_record))
        .route("/play", post(tap_play))
        .route("/status", get(session_status))
        .with_state(state)
}

async fn tap_record(State(state): State<ControlsState>) -> ApiResult<Json<SessionStatus>> {
    info!("Record tapped via API");
    tap(&state, AppEvent::RecordTapped).await
}

async fn tap_play(State(state): State<ControlsState>) -> ApiResult<Json<SessionStatus>> {
    info!("Play tapped via API");
    tap(&state, AppEvent::PlayTapped).await
}

/// Gets the current session status, including both controls' label and visibility.
async fn session_status(State(state): State<ControlsState>) -> Json<SessionStatus> {
    Json(state.status.get())
}

/// Posts a tap into the event loop and returns the status right after that
/// tap was handled, regardless of what else was queued around it.
async fn tap(state: &ControlsState, event: AppEvent) -> ApiResult<Json<SessionStatus>> {
    let (command, reply) = ApiCommand::new(event);

    if let Err(e) = state.tx.send(command).await {
        error!("Failed to send {:?}: {}", e.0.event, e);
        return Err(ApiError::unavailable("Recorder event loop is not running"));
    }

    match reply.await {
        Ok(status) => Ok(Json(status)),
        Err(_) => Err(ApiError::unavailable("Recorder event loop stopped")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::PermissionStatus;
    use crate::session::SessionState;
    use std::path::PathBuf;

    fn state() -> (ControlsState, mpsc::Receiver<ApiCommand>) {
        let (tx, rx) = mpsc::channel(10);
        let status = StatusHandle::new(SessionStatus::initial(PathBuf::from("/tmp/r.wav")));
        (ControlsState { tx, status }, rx)
    }

    #[tokio::test]
    async fn test_tap_returns_the_reply_not_the_published_status() {
        let (state, mut rx) = state();
        let status = state.status.clone();

        let responder = tokio::spawn(async move {
            let command = rx.recv().await.unwrap();
            assert_eq!(command.event, AppEvent::PlayTapped);

            // Something else publishes first; the tap must not pick that up.
            let mut other = status.get();
            other.state = SessionState::Recorded;
            status.publish(other);

            let mut answer = status.get();
            answer.permission = PermissionStatus::Granted;
            answer.state = SessionState::Playing;
            command.reply.send(answer).unwrap();
        });

        let Json(body) = tap(&state, AppEvent::PlayTapped).await.unwrap();
        responder.await.unwrap();
        assert_eq!(body.state, SessionState::Playing);
    }

    #[tokio::test]
    async fn test_tap_without_event_loop_is_unavailable() {
        let (state, rx) = state();
        drop(rx);
        assert!(tap(&state, AppEvent::PlayTapped).await.is_err());
    }

    #[tokio::test]
    async fn test_dropped_reply_is_unavailable() {
        let (state, mut rx) = state();
        let responder = tokio::spawn(async move {
            drop(rx.recv().await.unwrap());
        });

        assert!(tap(&state, AppEvent::RecordTapped).await.is_err());
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn test_status_endpoint_reports_current_snapshot() {
        let (state, _rx) = state();
        let Json(body) = session_status(State(state)).await;
        assert_eq!(body.state, SessionState::Idle);
        assert!(!body.controls.record.visible);
    }
}
