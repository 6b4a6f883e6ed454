use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "aetherday", version, about = "Aetherday CLI")]
struct Cli {
    /// User id to act as
    #[arg(long, global = true, env = "AETHERDAY_USER", default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or edit the profile
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Energy regeneration and Regen Pod sessions
    Energy {
        #[command(subcommand)]
        action: commands::energy::EnergyAction,
    },
    /// Daily challenge and reward
    Challenge {
        #[command(subcommand)]
        action: commands::challenge::ChallengeAction,
    },
    /// Scheduled task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Aether Sink backlog
    Sink {
        #[command(subcommand)]
        action: commands::sink::SinkAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Bearer tokens for the HTTP API
    Token {
        #[command(subcommand)]
        action: commands::token::TokenAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let user = cli.user.as_str();
    let result = match cli.command {
        Commands::Profile { action } => commands::profile::run(action, user),
        Commands::Energy { action } => commands::energy::run(action, user),
        Commands::Challenge { action } => commands::challenge::run(action, user),
        Commands::Task { action } => commands::task::run(action, user),
        Commands::Sink { action } => commands::sink::run(action, user),
        Commands::Config { action } => commands::config::run(action),
        Commands::Token { action } => commands::token::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
