//! REST API server for the recorder.
//!
//! Stands in for the two on-screen buttons:
//! - Record control (POST /record)
//! - Play control (POST /play)
//! - Current controls and session state (GET /status)

pub mod error;
pub mod routes;

use crate::config::ApiConfig;
use anyhow::{Context, Result};
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tracing::info;

pub use routes::controls::{ApiCommand, ControlsState};

pub struct ApiServer {
    host: String,
    port: u16,
    controls_state: ControlsState,
}

impl ApiServer {
    pub fn new(controls_state: ControlsState, config: &ApiConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            controls_state,
        }
    }

    pub fn router(controls_state: ControlsState) -> Router {
        Router::new()
            .route("/", get(service_info))
            .route("/version", get(version))
            .merge(routes::controls::router(controls_state))
            .layer(ServiceBuilder::new())
    }

    pub async fn start(self) -> Result<()> {
        let app = Self::router(self.controls_state);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind API server to {addr}"))?;

        info!("API server listening on http://{}", addr);
        info!("Endpoints:");
        info!("  GET  /        - Service info");
        info!("  POST /record  - Tap the record control");
        info!("  POST /play    - Tap the play control");
        info!("  GET  /status  - Get controls and session state");
        info!("  GET  /version - Get version info");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "voice-recorder",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "voice-recorder"
    }))
}
