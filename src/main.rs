use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};

use holonet::{AppState, Config, Server, SwapiClient, app, logging};

/// Star Wars API façade.
#[derive(Debug, Parser)]
#[command(name = "holonet", version, about)]
struct Cli {
    /// JSON configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "HOLONET_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("holonet: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), holonet::Error> {
    let config = Config::load(cli.config.as_deref())?;
    logging::init(&config.log)?;
    match serde_json::to_string(&config) {
        Ok(effective) => debug!(config = %effective, "effective configuration"),
        Err(e) => debug!("cannot render effective configuration: {e}"),
    }

    let swapi = SwapiClient::from_config(&config)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        upstream = swapi.base(),
        api_prefix = %config.links.api_prefix,
        "holonet starting"
    );

    let router = app::router(AppState::new(swapi), &config.links);
    Server::bind(config.http.socket_addr()?).serve(router).await
}
