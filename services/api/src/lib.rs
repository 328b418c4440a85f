mod cli;
mod infra;
mod routes;
mod seed;
mod server;

use realty_site::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
