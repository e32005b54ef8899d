use crate::commands::{
    run_exam_fields, run_exam_list, run_normalize, ExamFieldsArgs, ExamListArgs, NormalizeArgs,
};
use crate::server;
use admit_ai::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Admission Predictor",
    about = "Browse the exam catalogue, normalize scores, and serve the admission predictor API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect the entrance exam catalogue
    Exams {
        #[command(subcommand)]
        command: ExamCommand,
    },
    /// Convert a score into a canonical rank and print the predictor payload
    Normalize(NormalizeArgs),
}

#[derive(Subcommand, Debug)]
enum ExamCommand {
    /// List catalogued exams grouped by stream
    List(ExamListArgs),
    /// Show the inputs and qualifier fields an exam's form collects
    Fields(ExamFieldsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Exams {
            command: ExamCommand::List(args),
        } => run_exam_list(args),
        Command::Exams {
            command: ExamCommand::Fields(args),
        } => run_exam_fields(args),
        Command::Normalize(args) => run_normalize(args),
    }
}
