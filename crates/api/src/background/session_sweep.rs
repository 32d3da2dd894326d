//! Periodic eviction of idle wizard sessions.
//!
//! Sessions are opened by anonymous clients and usually abandoned rather
//! than deleted, so the registry is swept on a fixed interval using
//! `tokio::time::interval`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::sessions::WizardSessions;

/// How often the sweep runs.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Run the sweep loop until `cancel` is triggered.
pub async fn run(sessions: Arc<WizardSessions>, every: Duration, cancel: CancellationToken) {
    tracing::info!(
        idle_ttl_secs = sessions.idle_ttl().as_secs(),
        interval_secs = every.as_secs(),
        "Session sweep started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweep stopping");
                break;
            }
            _ = interval.tick() => {
                let evicted = sessions.evict_idle(Instant::now()).await;
                if evicted > 0 {
                    let remaining = sessions.count().await;
                    tracing::info!(evicted, remaining, "Evicted idle onboarding sessions");
                } else {
                    tracing::debug!("Session sweep: nothing to evict");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sweep_evicts_expired_sessions_and_stops_on_cancel() {
        let sessions = Arc::new(WizardSessions::with_idle_ttl(Duration::ZERO));
        sessions.open("web_app").await;
        sessions.open("landing_page").await;

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(
            Arc::clone(&sessions),
            Duration::from_millis(10),
            cancel.clone(),
        ));

        // The first tick fires immediately.
        for _ in 0..50 {
            if sessions.count().await == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(sessions.count().await, 0);

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweep should stop after cancel")
            .unwrap();
    }
}
