//! Background worker applying queued hit events to the mapping store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, info, warn};

use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::MappingStore;

/// Extra attempts per event after the first failure.
const HIT_RETRIES: usize = 2;
const HIT_RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Consumes hit events until every sender is dropped.
///
/// Each event increments the mapping's hit count, retrying briefly on store
/// errors. Events that still fail are logged and discarded: hit counts are
/// best-effort and never block or fail a resolution.
pub async fn run_hit_worker(mut rx: mpsc::Receiver<HitEvent>, store: Arc<dyn MappingStore>) {
    info!("Hit worker started");

    while let Some(event) = rx.recv().await {
        let strategy = FixedInterval::new(HIT_RETRY_INTERVAL).take(HIT_RETRIES);

        let result = Retry::spawn(strategy, || store.increment_hit_count(&event.short_code)).await;

        match result {
            Ok(()) => debug!("Hit recorded for {}", event.short_code),
            Err(e) => warn!("Dropping hit for {}: {}", event.short_code, e),
        }
    }

    info!("Hit worker stopped: all senders dropped");
}
