use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use x402_gateway::config::AppConfig;
use x402_gateway::ledger::aptos::AptosNodeClient;
use x402_gateway::service::payment_gate::PaymentGate;
use x402_gateway::store::event_store::EventStore;
use x402_gateway::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    if cfg.receiver.is_none() {
        tracing::warn!("PAYMENT_RECEIVER not set; all paid requests will be denied");
    }

    let event_store = EventStore::default();
    let gate = PaymentGate {
        receiver: cfg.receiver.clone(),
        anon_salt: cfg.anon_salt.clone(),
        store: event_store.clone(),
        ledger: Arc::new(AptosNodeClient::new(
            cfg.node_url.clone(),
            cfg.ledger_timeout_ms,
        )),
    };

    let state = AppState {
        gate,
        event_store,
        anon_salt: cfg.anon_salt.clone(),
    };

    let app = Router::new()
        .route("/health", get(x402_gateway::http::handlers::premium::health))
        .route(
            "/api/premium-data",
            post(x402_gateway::http::handlers::premium::premium_data),
        )
        .route(
            "/api/predictions",
            post(x402_gateway::http::handlers::premium::predictions),
        )
        .route(
            "/api/events",
            get(x402_gateway::http::handlers::events::list_events),
        )
        .route(
            "/api/errors",
            get(x402_gateway::http::handlers::errors::errors_by_category),
        )
        .route(
            "/api/stats",
            get(x402_gateway::http::handlers::stats::stats),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
