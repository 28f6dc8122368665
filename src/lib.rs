// Socratic Seminar - payment-gated Socratic dialogue agent with a Cashu wallet backend

pub mod config;
pub mod models;
pub mod types;
pub mod llm;
pub mod payment;   // Payment backends and the debug-token bypass
pub mod wallet;    // Wallet service: Cashu token codec and proof storage
pub mod seminar;   // The validate -> agent -> redeem graph
pub mod routes;
pub mod utils;

use std::sync::Arc;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
pub use seminar::SeminarGraph;

/// Wire the shared application state from configuration
pub fn build_state(config: Config) -> anyhow::Result<AppState> {
    let bypass = payment::bypass_for(&config.payment);
    let wallet = wallet::Wallet::new(&config, bypass);
    let graph = SeminarGraph::from_config(&config)?;

    Ok(AppState {
        wallet: Arc::new(wallet),
        graph: Arc::new(graph),
    })
}

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
