use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crates_public::client::ApiClient;
use crates_public::{app, App, Config, Server};

#[tokio::main]
async fn main() -> Result<(), crates_public::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::parse();
    let client = ApiClient::new(&config.client_config())?;
    info!(backend = %client.base_url(), timeout_secs = config.backend_timeout_secs, "upstream configured");

    Server::bind(config.listen_addr())
        .serve(app::router(App::new(client)))
        .await
}
