use crate::predict::{run_predict, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use grinder_advisor::config::ModelConfig;
use grinder_advisor::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Grinder Advisor",
    about = "Serve and query questionnaire-based grinder recommendations",
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
    /// Recommend a grinder for a JSON answers file and print the rules behind it
    Predict(PredictArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ModelArgs {
    /// Override the trained tree artifact location
    #[arg(long)]
    pub(crate) model_path: Option<PathBuf>,
    /// Override the encoders artifact location
    #[arg(long)]
    pub(crate) encoders_path: Option<PathBuf>,
}

impl ModelArgs {
    pub(crate) fn apply(&mut self, config: &mut ModelConfig) {
        if let Some(path) = self.model_path.take() {
            config.tree_path = path;
        }
        if let Some(path) = self.encoders_path.take() {
            config.encoders_path = path;
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
    }
}
