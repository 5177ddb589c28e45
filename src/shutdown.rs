//! Shutdown signal plumbing
//!
//! Signal handling for [`App::run`](crate::App::run): resolve when the
//! process is asked to stop, so the tree can be torn down in order. This is
//! plumbing only; in-flight hook futures are never interrupted.

use tokio::signal;

/// Create a future that completes when a shutdown signal is received
/// (Ctrl+C, or SIGTERM on unix).
///
/// # Example
///
/// ```rust,ignore
/// use arbor::shutdown_signal;
///
/// app.boot().await?;
///
/// tokio::select! {
///     _ = shutdown_signal() => {}
///     _ = server.serve() => {}
/// }
///
/// app.shutdown().await?;
/// ```
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
