//! 预订事件总线
//!
//! 基于 `tokio::sync::broadcast` 的进程内广播。发布方不关心是否有订阅者；
//! 落后太多的订阅者会收到 `Lagged`，由订阅方自行做全量恢复。

use shared::ReservationEvent;
use tokio::sync::broadcast;

/// 广播通道容量
const EVENT_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ReservationEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 发布事件，返回收到事件的订阅者数量
    pub fn publish(&self, event: ReservationEvent) -> usize {
        tracing::debug!(
            event = %event.kind,
            reservation_id = event.reservation.id,
            "Publishing reservation event"
        );
        // 没有订阅者时 send 返回 Err，属正常情况
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReservationEvent> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
