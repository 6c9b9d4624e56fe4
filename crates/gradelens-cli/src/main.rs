//! The `gradelens` command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use gradelens_core::model::Trend;

mod commands;

use commands::{OutputFormat, Session};

#[derive(Parser)]
#[command(
    name = "gradelens",
    version,
    about = "School score analytics and teaching insights"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset file (.json / .toml) or directory; overrides the config
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score statistics for all scores or one scope
    Stats {
        /// Only scores of this course id
        #[arg(long, conflicts_with_all = ["student", "class"])]
        course: Option<i64>,

        /// Only scores of this student id
        #[arg(long, conflicts_with = "class")]
        student: Option<i64>,

        /// Only scores of students in this class
        #[arg(long)]
        class: Option<String>,
    },

    /// Pass rate per course
    PassRates,

    /// Average and pass rate per exam, in date order
    Exams {
        /// Trend of a single student instead of everyone
        #[arg(long)]
        student: Option<i64>,
    },

    /// Students ranked by average score
    Rankings,

    /// Teaching overview of one class
    Overview {
        /// Class name
        class: String,
    },

    /// Per-student risk flags for one class
    Flags {
        /// Class name
        class: String,
    },

    /// Course recommendations for one student
    Recommend {
        /// Student id
        student_id: i64,
    },

    /// Generate a single recommendation reason
    Reason {
        /// Course name
        #[arg(long)]
        course: String,

        /// Score trend: rising, falling, stable
        #[arg(long, default_value = "stable")]
        trend: Trend,

        /// Current score
        #[arg(long)]
        score: f64,

        /// Class average for the course
        #[arg(long)]
        class_avg: f64,

        #[arg(long, default_value = "0")]
        student_id: i64,

        #[arg(long, default_value = "")]
        student_name: String,

        /// Material titles to mention (repeatable)
        #[arg(long = "material")]
        materials: Vec<String>,

        /// Prompt sent instead of the configured one
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Check a dataset for common problems
    Validate,

    /// Create a starter gradelens.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "gradelens_core=info,gradelens_store=info,gradelens_reason=info",
                )
            }),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let session = || Session::load(cli.config.as_deref(), cli.dataset.clone(), cli.format);

    match cli.command {
        Commands::Stats {
            course,
            student,
            class,
        } => commands::stats::execute(&session()?, course, student, class),
        Commands::PassRates => commands::pass_rates::execute(&session()?),
        Commands::Exams { student } => commands::exams::execute(&session()?, student),
        Commands::Rankings => commands::rankings::execute(&session()?),
        Commands::Overview { class } => commands::overview::execute(&session()?, &class),
        Commands::Flags { class } => commands::flags::execute(&session()?, &class),
        Commands::Recommend { student_id } => {
            commands::recommend::execute(&session()?, student_id).await
        }
        Commands::Reason {
            course,
            trend,
            score,
            class_avg,
            student_id,
            student_name,
            materials,
            prompt,
        } => {
            commands::reason::execute(
                &session()?,
                commands::reason::ReasonArgs {
                    course,
                    trend,
                    score,
                    class_avg,
                    student_id,
                    student_name,
                    materials,
                    prompt,
                },
            )
            .await
        }
        Commands::Validate => commands::validate::execute(&session()?),
        Commands::Init => commands::init::execute(),
    }
}
