use log::{error, info, LevelFilter};
use rocket::Error as RocketError;
use thiserror::Error;

/// Environment variable naming an alternative logging config file.
const LOG_CONFIG_VAR: &str = "SURVEY_LOG_CONFIG";

/// Errors that are critical to the entire server.
#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    RocketError(#[from] RocketError),
}

async fn run() -> Result<(), Error> {
    info!("Configuring server...");
    let rocket = survey_backend::build().ignite().await?;
    info!("...server configured!");
    // Disable rocket logging from now on.
    log4rs_dynamic_filters::DynamicLevelFilter::set("rocket", LevelFilter::Off);
    let _ = rocket.launch().await?;
    Ok(())
}

#[rocket::main]
async fn main() {
    // Set up logging.
    let log_config = std::env::var(LOG_CONFIG_VAR).unwrap_or_else(|_| "log4rs.yaml".to_string());
    log4rs::init_file(&log_config, log4rs_dynamic_filters::default_deserializers())
        .expect("Failed to initialise logging");
    info!(
        "Initialised logging from {log_config}, starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    // Launch server.
    if let Err(err) = run().await {
        error!("{err}");
        error!("Critical failure, shutting down");
        std::process::exit(1)
    }
}
