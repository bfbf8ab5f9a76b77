use parking_fetcher::error::MainError;
use parking_fetcher::pipeline;
use shared::datamall::API_KEY_URL;
use shared::error::{ConfigError, InitializationError};
use shared::{API_KEY_ENV_VAR, load_config};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), MainError> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(InitializationError::Tracing)?;

    let config = load_config().map_err(InitializationError::from)?;
    info!(config = ?config, "config loaded");

    if let Err(ConfigError::MissingCredential) = config.datamall.account_key() {
        print_usage();
    }

    let res = pipeline::run(&config).await;
    match res {
        Ok(ref summary) => info!(total = summary.total, "bicycle parking data refreshed"),
        Err(ref e) => error!(error = ?e, "failed to refresh bicycle parking data"),
    }

    res?;
    Ok(())
}

fn print_usage() {
    eprintln!("Error: {API_KEY_ENV_VAR} environment variable is required");
    eprintln!("Usage: {API_KEY_ENV_VAR}=your_key cargo run -p parking_fetcher");
    eprintln!("Get your API key from: {API_KEY_URL}");
}
