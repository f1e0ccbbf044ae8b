use uuid::Uuid;

/// Emitted for each pending order a reconciliation sweep satisfied. Fed to
/// the SSE notification stream; carries no feedback into the allocation
/// logic.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderAvailableEvent {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub item_count: usize,
    pub timestamp: i64,
}
