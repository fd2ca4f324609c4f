//! The adaptiq command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "adaptiq", version, about = "Adaptive difficulty assessments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an adaptive test
    Run {
        /// Path to a .toml question bank
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Number of questions (default: from config, 15)
        #[arg(long)]
        questions: Option<u32>,

        /// Name shown on reports and the leaderboard
        #[arg(long)]
        name: Option<String>,

        /// Answer script (one "KEY MILLIS" per line) instead of stdin
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Results directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to question bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Print the report of a saved session
    Report {
        /// Session report JSON
        #[arg(long)]
        session: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List completed sessions, newest first
    History {
        /// Results directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the top scores
    Leaderboard {
        /// Results directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Number of entries to show
        #[arg(long, default_value = "50")]
        limit: usize,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example question bank
    Init,
}

/// How a session report is printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Plain-text assessment report
    Text,
    /// Pretty-printed JSON
    Json,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("adaptiq=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            bank,
            questions,
            name,
            answers,
            output,
            format,
            config,
        } => {
            commands::run::execute(bank, questions, name, answers, output, format, config).await
        }
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Report { session, format } => commands::report::execute(session, format),
        Commands::History { output, config } => commands::history::execute(output, config).await,
        Commands::Leaderboard {
            output,
            limit,
            config,
        } => commands::leaderboard::execute(output, limit, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
