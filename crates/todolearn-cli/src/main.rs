//! The `todolearn` command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "todolearn",
    version,
    about = "Spaced-repetition flashcards in the terminal"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review due cards interactively
    Review {
        /// Deck file (defaults to the configured deck)
        #[arg(long)]
        deck: Option<PathBuf>,

        /// Active review modes (comma-separated, default: all)
        #[arg(long)]
        modes: Option<String>,

        /// New cards introduced when nothing is due
        #[arg(long)]
        batch_size: Option<usize>,
    },

    /// Add cards from a TOML file or directory
    Import {
        /// Path to .toml card file or directory
        #[arg(long)]
        file: PathBuf,

        /// Deck file (defaults to the configured deck)
        #[arg(long)]
        deck: Option<PathBuf>,
    },

    /// Check a deck for inconsistencies
    Validate {
        /// Deck file (defaults to the configured deck)
        #[arg(long)]
        deck: Option<PathBuf>,
    },

    /// Show scheduled cards
    List {
        /// Deck file (defaults to the configured deck)
        #[arg(long)]
        deck: Option<PathBuf>,

        /// Review modes to show (comma-separated, default: all)
        #[arg(long)]
        modes: Option<String>,
    },

    /// List available review modes
    Modes,

    /// Create starter config and example deck
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("todolearn=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Review {
            deck,
            modes,
            batch_size,
        } => commands::review::execute(deck, modes, batch_size, config),
        Commands::Import { file, deck } => commands::import::execute(file, deck, config),
        Commands::Validate { deck } => commands::validate::execute(deck, config),
        Commands::List { deck, modes } => commands::list::execute(deck, modes, config),
        Commands::Modes => commands::modes::execute(),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
