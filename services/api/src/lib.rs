pub mod config;
pub mod error;
pub mod telemetry;

mod batch;
mod cli;
mod commands;
mod infra;
mod routes;
mod server;

pub use error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
