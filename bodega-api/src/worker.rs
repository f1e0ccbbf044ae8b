use bodega_order::ReconciliationEngine;
use bodega_shared::events::OrderAvailableEvent;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration};
use tracing::{error, info};

use crate::notifications::publish_available;

/// Background availability sweep.
///
/// The manual verify endpoint covers the interactive case; this loop catches
/// stock that changed through paths with no sweep attached (direct database
/// edits, future import jobs). Interval 0 disables it.
pub async fn run_availability_worker(
    engine: Arc<ReconciliationEngine>,
    notify_tx: broadcast::Sender<OrderAvailableEvent>,
    interval_seconds: u64,
) {
    if interval_seconds == 0 {
        info!("Availability worker disabled (interval 0)");
        return;
    }

    info!("Availability worker started, sweeping every {}s", interval_seconds);
    let mut ticker = interval(Duration::from_secs(interval_seconds));

    loop {
        ticker.tick().await;
        match engine.verify_availability().await {
            Ok(satisfied) => {
                if !satisfied.is_empty() {
                    info!("Background sweep satisfied {} order(s)", satisfied.len());
                    publish_available(&notify_tx, &satisfied);
                }
            }
            Err(e) => error!("Background sweep failed: {}", e),
        }
    }
}
