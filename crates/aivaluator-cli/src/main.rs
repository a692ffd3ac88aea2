//! aivaluator CLI: generates grading forms and renders scored results.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "aivaluator",
    version,
    about = "Form generator and result renderer for answer grading"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the input form for a number of students and questions
    Form {
        /// Number of students
        #[arg(long, allow_hyphen_values = true)]
        students: String,

        /// Number of questions
        #[arg(long, allow_hyphen_values = true)]
        questions: String,

        /// Output directory
        #[arg(long, default_value = "./aivaluator-results")]
        output: PathBuf,

        /// Also write an empty session file with every field id
        #[arg(long)]
        session_out: Option<PathBuf>,
    },

    /// Check a session file for empty or stray fields
    Validate {
        /// Path to session TOML
        #[arg(long)]
        session: PathBuf,
    },

    /// Submit a session to the scoring service and render the results
    Submit {
        /// Path to session TOML
        #[arg(long)]
        session: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory (defaults to the configured output_dir)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: html, json, all
        #[arg(long, default_value = "html")]
        format: String,

        /// Submit even if some fields are empty
        #[arg(long)]
        allow_empty: bool,
    },

    /// Render a saved score report JSON as a results page
    Render {
        /// Score report JSON
        #[arg(long)]
        report: PathBuf,

        /// Question count to average over (defaults to the number of questions in the report)
        #[arg(long)]
        questions: Option<usize>,

        /// Output directory
        #[arg(long, default_value = "./aivaluator-results")]
        output: PathBuf,
    },

    /// Create starter config and example session
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("aivaluator=info,aivaluator_core=info,aivaluator_client=info")
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Form {
            students,
            questions,
            output,
            session_out,
        } => commands::form::execute(&students, &questions, output, session_out),
        Commands::Validate { session } => commands::validate::execute(session),
        Commands::Submit {
            session,
            config,
            output,
            format,
            allow_empty,
        } => commands::submit::execute(session, config, output, format, allow_empty).await,
        Commands::Render {
            report,
            questions,
            output,
        } => commands::render::execute(report, questions, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
