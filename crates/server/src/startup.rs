use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use common::shutdown::shutdown_signal;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, auth::ServerState, Access};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Public entry: connect the store, build the app and serve until a shutdown signal arrives.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let store = models::db::connect(&cfg.database).await?;
    let state = ServerState::from_store(&store, &cfg.auth);

    for (method, path, access) in routes::policy(&state) {
        if access == Access::Bearer {
            info!(%method, path, "route requires bearer token");
        }
    }

    let app: Router = routes::build_router(state, build_cors());

    // the store is closed whether serving ended cleanly or not
    let served = match bind_addr(&cfg) {
        Ok(addr) => serve(app, addr, shutdown_signal()).await,
        Err(e) => Err(e),
    };
    store.shutdown().await;
    served?;
    info!("server stopped");
    Ok(())
}

/// Bind `addr` and serve `app` until `shutdown` resolves.
async fn serve<F>(app: Router, addr: SocketAddr, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Car-doctor-server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}
