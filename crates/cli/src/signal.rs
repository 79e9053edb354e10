//! Shutdown signal handling

use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Cancel `token` on the first SIGINT or SIGTERM
pub fn cancel_on_shutdown(token: CancellationToken) {
    tokio::spawn(async move {
        wait_for_shutdown().await;
        warn!("Shutdown signal received, stopping workers");
        token.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_shutdown() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "Failed to install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
}
