use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use bodega_order::Order;
use bodega_shared::events::OrderAvailableEvent;
use futures_util::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::state::AppState;

/// Fans a sweep result out to the notification stream. Purely informational;
/// dropped events (no subscribers, lagging subscribers) are fine.
pub fn publish_available(tx: &broadcast::Sender<OrderAvailableEvent>, orders: &[Order]) {
    for order in orders {
        let event = OrderAvailableEvent {
            order_id: order.id,
            customer_id: order.customer_id,
            item_count: order.items.len(),
            timestamp: chrono::Utc::now().timestamp(),
        };
        let _ = tx.send(event);
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/notifications", get(stream_notifications))
}

/// GET /v1/notifications
///
/// Server-sent events: one `order-available` event per order a sweep just
/// satisfied. This is what the UI turns into toasts.
async fn stream_notifications(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = BroadcastStream::new(state.notify_tx.subscribe())
        .filter_map(|msg| async move { msg.ok() })
        .map(|event| Event::default().event("order-available").json_data(&event));

    Sse::new(stream).keep_alive(KeepAlive::default())
}
