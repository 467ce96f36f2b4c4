use axum::Router;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use rentals_realtime::core::{AppState, RealtimeConfig};
use rentals_realtime::router::init_router;
use rentals_realtime::welcome::welcome;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    dotenv().ok();
    let run_mode = RealtimeConfig::run_mode();
    let config = RealtimeConfig::new_config(&run_mode).unwrap_or_else(|err| panic!("Missing needed env: {}", err));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
    welcome(&run_mode);

    let url = format!("{}:{}", config.server_host, config.server_port);
    let app: Router = init_router(AppState::new(config));
    let listener = TcpListener::bind(&url).await.unwrap_or_else(|err| panic!("Unable to bind {url}: {err}"));
    info!("Server is listening on: {url}");
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server stopped with error: {err}");
    }
    info!("Stopping rentals realtime service...");
}
