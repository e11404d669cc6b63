use std::sync::Arc;

use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use petfront::server::config::ServerConfig;
use petfront::web::create_axum_router;

fn init_logging() {
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    // Default to `info` level if RUST_LOG is not set.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let config = Arc::new(ServerConfig::from_env()?);
    let app_router = create_axum_router(config.clone());

    info!(
        addr = %config.listen_addr,
        petstore_api = %config.petstore_api_url,
        "petfront listening"
    );
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app_router).await?;
    Ok(())
}
