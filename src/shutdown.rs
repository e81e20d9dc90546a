use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Cancels `cancelation` on ctrl-c. Returns as soon as the token is cancelled from either
/// side, so it can sit in a `join!` next to the parts that quit on their own.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => {},
    };
}
