use std::process::ExitCode;
use std::sync::Arc;

use fit_match::config::{LoggingSettings, Settings};
use fit_match::models::{ErrorResponse, PotentialMatchesQuery};
use fit_match::services::{MatchingService, PostgresClient};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: fit-match <user-id> [radius-miles] [limit]";

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.logging);

    let (user_id, query) = match parse_args(std::env::args().skip(1)) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };

    let postgres = match PostgresClient::from_settings(&settings.database).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to connect to PostgreSQL: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("PostgreSQL client initialized");

    let service = match MatchingService::from_settings(postgres.clone(), postgres, &settings) {
        Ok(service) => service,
        Err(e) => {
            error!("Invalid scoring configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Matcher initialized with weights: {:?}", service.matcher().weights());

    match service.query(user_id, &query).await {
        Ok(response) => print_json(&response),
        Err(e) => {
            if e.is_client_error() {
                info!(user_id, "Potential matches request rejected: {}", e);
            } else {
                error!(user_id, "Potential matches request failed: {}", e);
            }

            print_json(&ErrorResponse::from(&e));

            if e.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn parse_args<I>(mut args: I) -> Result<(i32, PotentialMatchesQuery), String>
where
    I: Iterator<Item = String>,
{
    let user_id = args
        .next()
        .ok_or_else(|| "missing user id".to_string())?
        .parse::<i32>()
        .map_err(|e| format!("invalid user id: {}", e))?;

    let radius = args
        .next()
        .map(|r| r.parse::<u32>().map_err(|e| format!("invalid radius: {}", e)))
        .transpose()?;

    let limit = args
        .next()
        .map(|l| l.parse::<u32>().map_err(|e| format!("invalid limit: {}", e)))
        .transpose()?;

    if args.next().is_some() {
        return Err("too many arguments".to_string());
    }

    Ok((user_id, PotentialMatchesQuery::new(radius, limit)))
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}
