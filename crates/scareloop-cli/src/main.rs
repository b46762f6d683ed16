use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "scareloop-cli", version, about = "Scareloop CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Consent gate (waiver) management
    Waiver {
        #[command(subcommand)]
        action: commands::waiver::WaiverAction,
    },
    /// Scare engine control
    Engine {
        #[command(subcommand)]
        action: commands::engine::EngineAction,
    },
    /// Media-playing liveness flag
    Media {
        #[command(subcommand)]
        action: commands::media::MediaAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Waiver { action } => commands::waiver::run(action),
        Commands::Engine { action } => commands::engine::run(action),
        Commands::Media { action } => commands::media::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
