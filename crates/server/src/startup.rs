use std::{future::Future, sync::Arc};

use configs::AppConfig;
use migration::MigratorTrait;
use mockable::DefaultClock;
use service::appointment::{repo::seaorm::SeaOrmAppointmentRepository, AppointmentService};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};

/// Any origin may call the API.
fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the store, make sure the table exists and wire the service.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!(event = "schema_ready", "appointments table ready");

    let repo = Arc::new(SeaOrmAppointmentRepository::new(db));
    let svc = AppointmentService::new(repo, Arc::new(DefaultClock));
    Ok(ServerState::new(svc))
}

/// Build the app and serve it until `shutdown` resolves.
pub async fn run_with_config<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg).await?;
    let app = routes::build_router(state, build_cors());

    let listener = tokio::net::TcpListener::bind(cfg.server.bind_addr()).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "agenda server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!(%addr, "agenda server drained");
    Ok(())
}
