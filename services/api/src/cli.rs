use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use tier_engine::Gender;

use crate::commands;
use crate::error::AppError;
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "tier-engine",
    about = "Score questionnaires, grade percentiles, and check tier entitlements",
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
    /// Evaluate one answer set and print the breakdown, percentile, and tier
    Evaluate(EvaluateArgs),
    /// Evaluate every user in a `user_id,gender,question_id,value` CSV export
    Batch(BatchArgs),
    /// Print the percentile band table
    Tiers,
    /// Decide whether a viewer may open a profile of another tier
    Access(AccessArgs),
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

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Gender whose question set applies (male/female)
    #[arg(long, value_parser = parse_gender)]
    pub(crate) gender: Gender,
    /// JSON file holding a list of `{question_id, value}` answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Weight document to score against instead of the configured one
    #[arg(long)]
    pub(crate) weights: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export with one answer per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Weight document to score against instead of the configured one
    #[arg(long)]
    pub(crate) weights: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct AccessArgs {
    /// Tier label of the viewer (e.g. Gold)
    #[arg(long)]
    pub(crate) viewer_tier: String,
    /// Tier label of the profile being opened
    #[arg(long)]
    pub(crate) target_tier: String,
    /// Subscription plan id (free, plus, premium, or one from PLANS_PATH)
    #[arg(long)]
    pub(crate) plan: String,
    /// Profiles already viewed today
    #[arg(long, default_value_t = 0)]
    pub(crate) views: u32,
}

fn parse_gender(raw: &str) -> Result<Gender, String> {
    raw.parse::<Gender>().map_err(|err| err.to_string())
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => commands::run_evaluate(args),
        Command::Batch(args) => commands::run_batch(args),
        Command::Tiers => {
            commands::run_tiers();
            Ok(())
        }
        Command::Access(args) => commands::run_access(args),
    }
}
