use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use voice_recorder::{
    app,
    cli::{handle_control_command, handle_path_command, Cli, CliCommand},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("voice-recorder {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(CliCommand::Path) => {
            handle_path_command()?;
            return Ok(());
        }
        Some(command) => {
            handle_control_command(&command).await?;
            return Ok(());
        }
        None => {}
    }

    app::run_service().await
}
