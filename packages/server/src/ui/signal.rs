//! Shutdown signal handling.

/// Resolves when Ctrl+C is received
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            // Never resolve: keep serving rather than shutting down immediately
            std::future::pending::<()>().await;
        }
    }
}
