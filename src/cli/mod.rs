use crate::config::Config;
use crate::session::{RecordingAsset, SessionStatus};
use anyhow::Result;

pub mod args;
pub mod client;

pub use args::{Cli, CliCommand};
pub use client::ControlsClient;

pub async fn handle_control_command(command: &CliCommand) -> Result<()> {
    let config = Config::load()?;
    let client = ControlsClient::new(&config.api.base_url());

    let status = match command {
        CliCommand::Record => client.tap_record().await?,
        CliCommand::Play => client.tap_play().await?,
        _ => client.status().await?,
    };

    print!("{}", format_status(&status));
    Ok(())
}

pub fn handle_path_command() -> Result<()> {
    let asset = RecordingAsset::fixed()?;
    println!("{}", asset.path().display());
    Ok(())
}

pub fn format_status(status: &SessionStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!("State: {}\n", status.state.as_str()));
    out.push_str(&format!("Permission: {}\n", status.permission.as_str()));

    for (name, control) in [("Record", &status.controls.record), ("Play", &status.controls.play)] {
        if control.visible {
            out.push_str(&format!("{name}: [{}]\n", control.label));
        } else {
            out.push_str(&format!("{name}: (hidden)\n"));
        }
    }

    if let Some(at) = status.last_recorded_at {
        out.push_str(&format!(
            "Last recording: {} ({})\n",
            at.format("%Y-%m-%d %H:%M:%S UTC"),
            status.asset_path.display()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::PermissionStatus;
    use crate::session::SessionState;
    use std::path::PathBuf;

    #[test]
    fn test_format_status_before_permission() {
        let status = SessionStatus::initial(PathBuf::from("/tmp/recording.wav"));
        let text = format_status(&status);
        assert!(text.contains("State: idle"));
        assert!(text.contains("Permission: unknown"));
        assert!(text.contains("Record: (hidden)"));
        assert!(text.contains("Play: (hidden)"));
        assert!(!text.contains("Last recording"));
    }

    #[test]
    fn test_format_status_after_recording() {
        let mut status = SessionStatus::initial(PathBuf::from("/tmp/recording.wav"));
        status.state = SessionState::Recorded;
        status.permission = PermissionStatus::Granted;
        status.controls = crate::ui::render(status.state, status.permission, false);
        status.last_recorded_at = Some(chrono::Utc::now());

        let text = format_status(&status);
        assert!(text.contains("Record: [Tap to re-record]"));
        assert!(text.contains("Play: [Play your recording]"));
        assert!(text.contains("Last recording:"));
    }
}
