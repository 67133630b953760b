use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod request;

#[derive(Parser)]
#[command(name = "timeblock", version, about = "Timeblock scheduling CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place tasks into free time
    Schedule {
        /// Request JSON file, or "-" for stdin
        request: String,
    },
    /// Propose habit blocks
    Habits {
        /// Request JSON file, or "-" for stdin
        request: String,
    },
    /// Schedule tasks, then habits, on one shared pool
    Plan {
        /// Request JSON file, or "-" for stdin
        request: String,
    },
    /// Show the free-slot pool
    Free {
        /// Request JSON file, or "-" for stdin
        request: String,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Schedule { request } => commands::plan::schedule(&request),
        Commands::Habits { request } => commands::plan::habits(&request),
        Commands::Plan { request } => commands::plan::plan(&request),
        Commands::Free { request } => commands::plan::free(&request),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
