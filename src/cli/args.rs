use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "voice-recorder")]
#[command(about = "Record one voice memo and play it back", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CliCommand {
    /// Tap the record control of the running service
    Record,
    /// Tap the play control of the running service
    Play,
    /// Show the controls and session state of the running service
    Status,
    /// Print where the recording is stored
    Path,
    /// Print version information
    Version,
}
