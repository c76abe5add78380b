//! learnscape CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "learnscape", version, about = "Digital worksheet grading engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a student's answers against a worksheet
    Grade {
        /// Path to the worksheet TOML
        #[arg(long)]
        worksheet: PathBuf,

        /// Path to a JSON array of answer strings, index-aligned with
        /// the worksheet questions
        #[arg(long)]
        answers: PathBuf,

        /// Student name recorded on the submission
        #[arg(long, default_value = "Student")]
        student: String,

        /// Skip the semantic evaluator and grade with the deterministic
        /// matcher only
        #[arg(long)]
        offline: bool,

        /// Directory for the graded submission JSON
        #[arg(long, default_value = "./submissions")]
        output: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate worksheet TOML files
    Validate {
        /// Path to a worksheet file or directory
        #[arg(long)]
        worksheet: PathBuf,
    },

    /// Generate a worksheet with an AI provider
    Generate {
        /// Subject matter, e.g. "Aljabar"
        #[arg(long)]
        topic: String,

        /// Grade level, e.g. "Kelas 8"
        #[arg(long)]
        class_level: String,

        /// Number of questions to generate
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=10))]
        count: u8,

        /// Output worksheet TOML path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and an example worksheet
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("learnscape=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            worksheet,
            answers,
            student,
            offline,
            output,
            config,
        } => commands::grade::execute(worksheet, answers, student, offline, output, config).await,
        Commands::Validate { worksheet } => commands::validate::execute(worksheet),
        Commands::Generate {
            topic,
            class_level,
            count,
            output,
            config,
        } => commands::generate::execute(topic, class_level, count, output, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
