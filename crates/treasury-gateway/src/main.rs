use std::{net::SocketAddr, sync::Arc};

use anyhow::Result as AnyResult;
use tracing::info;
use treasury_gateway::{AppState, build_router};
use treasury_platform::ServiceConfig;
use treasury_store::{DiskProofStore, InMemoryPaymentStore};

#[tokio::main]
async fn main() -> AnyResult<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "treasury_gateway=info,tower_http=info".to_string()),
        )
        .init();

    let config = ServiceConfig::from_env("0.0.0.0:8080")?;
    let payments = Arc::new(InMemoryPaymentStore::default());
    let proofs = Arc::new(DiskProofStore::open(&config.upload_dir).await?);
    info!(
        upload_dir = %proofs.root().display(),
        total_flats = config.society.total_flats,
        "payment store ready (in-memory, cleared on restart)"
    );

    let state = AppState::new(&config, payments, proofs);
    let router = build_router(state);

    let addr: SocketAddr = config.http_addr.parse()?;
    info!("treasury gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
