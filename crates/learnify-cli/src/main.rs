//! learnify CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "learnify", version, about = "Adaptive practice sessions for young learners")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a practice session
    Practice {
        /// Learner name (must exist in the roster)
        #[arg(long)]
        learner: String,

        /// Subject: math, english, or hebrew
        #[arg(long)]
        subject: String,

        /// Category within the subject (e.g. "addition", "reading_practice")
        #[arg(long)]
        category: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the roster file location
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Manage the learner roster
    Learners {
        #[command(subcommand)]
        action: LearnersAction,
    },

    /// Create a starter config file
    Init,
}

#[derive(Subcommand)]
enum LearnersAction {
    /// List learners and their progress
    List {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the roster file location
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Add a learner
    Add {
        /// Display name
        #[arg(long)]
        name: String,

        /// School grade, 1-6
        #[arg(long)]
        grade: u8,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the roster file location
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("learnify=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Practice {
            learner,
            subject,
            category,
            config,
            store,
        } => commands::practice::execute(learner, subject, category, config, store).await,
        Commands::Learners { action } => match action {
            LearnersAction::List { config, store } => {
                commands::learners::list(config, store)
            }
            LearnersAction::Add {
                name,
                grade,
                config,
                store,
            } => commands::learners::add(name, grade, config, store),
        },
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
