use shop_sync::dispatch::NoHaptics;
use shop_sync::{router, AppState, HttpRemote, Settings, SyncOrchestrator};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let settings = Settings::from_env();
    info!(remote = %settings.remote_url, "syncing with remote dashboard service");

    let remote = Arc::new(HttpRemote::new(settings.remote_url.clone()));
    let sync = SyncOrchestrator::new(remote, &settings.sync, Arc::new(NoHaptics));
    let poller = sync.start().await;

    let app = router(AppState::new(sync));
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    poller.abort();
    Ok(())
}
