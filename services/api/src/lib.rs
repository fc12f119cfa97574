mod cli;
mod infra;
mod offline;
mod routes;
mod server;

use credit_engine::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
