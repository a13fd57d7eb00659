//! 监听注册表 - 单槽位的事件订阅
//!
//! 同一时刻最多一个活跃 sink。`start` 直接替换旧 sink（不通知、不排空），
//! `stop` 清空槽位。`start`/`stop` 可能来自 UI 线程，而投递发生在通知回调线程，
//! 所以槽位用 `RwLock` 保护：投递时只在锁内克隆 `Arc`，调用 sink 时不持锁。

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

use super::event::PaymentEvent;
use super::sink::{DeliveryOutcome, PaymentSink};

/// 单槽位监听注册表
#[derive(Default)]
pub struct ListenerRegistry {
    active: RwLock<Option<Arc<dyn PaymentSink>>>,
}

impl ListenerRegistry {
    /// 创建空闲状态的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册 sink，替换已有的 sink
    pub fn start(&self, sink: Arc<dyn PaymentSink>) {
        let mut slot = self.active.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.as_ref() {
            debug!(previous = previous.name(), next = sink.name(), "Replacing payment sink");
        }
        info!(sink = sink.name(), "Payment listener started");
        *slot = Some(sink);
    }

    /// 清空 sink；空闲时调用无效果
    pub fn stop(&self) {
        let mut slot = self.active.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            info!(sink = previous.name(), "Payment listener stopped");
        }
    }

    /// 是否有活跃 sink
    pub fn is_active(&self) -> bool {
        self.current().is_some()
    }

    /// 当前 sink 名称
    pub fn active_sink_name(&self) -> Option<String> {
        self.current().map(|s| s.name().to_string())
    }

    /// 把事件交给当前 sink，最多调用一次
    ///
    /// sink 返回的错误和 panic 都在这里拦截，不会传回通知回调路径。
    pub fn deliver(&self, event: PaymentEvent) -> DeliveryOutcome {
        let Some(sink) = self.current() else {
            debug!(app_id = %event.application_id, "No active sink, payment event dropped");
            return DeliveryOutcome::NoSink;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| sink.deliver(&event))) {
            Ok(Ok(())) => DeliveryOutcome::Delivered,
            Ok(Err(e)) => {
                warn!(sink = sink.name(), error = %e, "Payment sink delivery failed");
                DeliveryOutcome::Failed(e.to_string())
            }
            Err(_) => {
                warn!(sink = sink.name(), "Payment sink panicked during delivery");
                DeliveryOutcome::Failed(format!("sink {} panicked", sink.name()))
            }
        }
    }

    fn current(&self) -> Option<Arc<dyn PaymentSink>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
