//! API server entry point.

use api::config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::{InMemoryOrderStore, OrderStore, PostgresOrderStore};
use pricing::{CatalogPriceResolver, PriceResolver};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve<S, R>(config: &Config, store: S, resolver: R, metrics_handle: PrometheusHandle)
where
    S: OrderStore + 'static,
    R: PriceResolver + 'static,
{
    let state = api::create_state(store, resolver, config.price_fallback);
    let app = api::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, price_fallback = %config.price_fallback, "starting order service");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

#[tokio::main]
async fn main() {
    // 1. Load configuration
    let config = Config::from_env().expect("invalid configuration");

    // 2. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 3. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 4. Build the catalog client
    let resolver =
        CatalogPriceResolver::new(&config.catalog()).expect("invalid catalog configuration");
    tracing::info!(
        catalog = %config.catalog_service_url,
        timeout_ms = config.catalog_timeout.as_millis() as u64,
        "catalog price resolver ready"
    );

    // 5. Pick the order store and serve
    match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .acquire_timeout(config.database_acquire_timeout)
                .connect(url)
                .await
                .expect("failed to connect to database");
            let store = PostgresOrderStore::new(pool);

            if config.run_migrations {
                store
                    .run_migrations()
                    .await
                    .expect("failed to run migrations");
                tracing::info!("database migrations applied");
            }

            serve(&config, store, resolver, metrics_handle).await;
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, orders are kept in memory only");
            serve(&config, InMemoryOrderStore::new(), resolver, metrics_handle).await;
        }
    }

    tracing::info!("server shut down gracefully");
}
