use bodega_api::{app, worker, AppState};
use bodega_store::{
    DbClient, PostgresCustomerRepository, PostgresOrderRepository, PostgresProductRepository,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bodega_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = bodega_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Bodega API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let state = AppState::new(
        Arc::new(PostgresProductRepository::new(db.pool.clone())),
        Arc::new(PostgresCustomerRepository::new(db.pool.clone())),
        Arc::new(PostgresOrderRepository::new(db.pool.clone())),
        config.business_rules.clone(),
    );

    tokio::spawn(worker::run_availability_worker(
        state.engine.clone(),
        state.notify_tx.clone(),
        config.business_rules.reconcile_interval_seconds,
    ));

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
