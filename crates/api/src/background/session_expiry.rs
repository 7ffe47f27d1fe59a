//! Periodic removal of expired watch parties.
//!
//! Expiry is also enforced lazily on join; this sweep keeps abandoned
//! sessions (for example a host who closed the tab without leaving) from
//! accumulating until someone tries the code again.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use watchparty_db::repositories::WatchPartyRepo;

/// Run the expiry sweep loop until `cancel` is triggered.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Watch party expiry sweep started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Watch party expiry sweep stopping");
                break;
            }
            _ = ticker.tick() => {
                match WatchPartyRepo::delete_expired(&pool).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Expiry sweep: removed expired watch parties");
                        } else {
                            tracing::debug!("Expiry sweep: nothing to remove");
                        }
                    }
                    Err(e) => {
                        tracing::error!(
                            operation = "expiry_sweep",
                            error = %e,
                            "Expiry sweep: cleanup failed"
                        );
                    }
                }
            }
        }
    }
}
