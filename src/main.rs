//! Chargeback API server entry point.

use anyhow::Context;
use chargeback_api::api::rest::{AppState, create_router};
use chargeback_api::application::use_cases::CreateChargebackUseCase;
use chargeback_api::config::AppConfig;
use chargeback_api::infrastructure::persistence::ChargebackRepository;
use chargeback_api::infrastructure::persistence::dynamodb::{
    DynamoDbChargebackRepository, build_client, verify_table,
};
use chargeback_api::telemetry;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    telemetry::init(&config.logging);

    tracing::info!(
        version = %config.logging.version,
        port = config.server.port,
        table = %config.dynamodb.table_name,
        "starting chargeback-api"
    );

    let client = build_client(&config.dynamodb).await;
    verify_table(&client, &config.dynamodb.table_name)
        .await
        .with_context(|| format!("table '{}' not accessible", config.dynamodb.table_name))?;

    let repository: Arc<dyn ChargebackRepository> = Arc::new(DynamoDbChargebackRepository::new(
        client,
        config.dynamodb.table_name.clone(),
    ));
    let state = Arc::new(AppState::new(
        CreateChargebackUseCase::new(repository),
        config.logging.version.clone(),
    ));
    let router = create_router(state, config.server.request_timeout());

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(%address, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
