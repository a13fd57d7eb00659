//! 通知监听服务 - 系统通知框架与检测核心之间的接入点
//!
//! 负责三件事：
//! - 入站：接收系统投递的通知，先做包名别名转换再交给检测器
//! - 激活：检查权限后注册 sink（`start_listening` / `stop_listening`）
//! - 查询：对外暴露权限状态
//!
//! 分类本身不检查权限，权限只在激活时检查。

use std::sync::Arc;
use tracing::{debug, warn};

use super::detector::{Classification, PaymentDetector};
use super::permission::PermissionGate;
use super::raw::RawNotification;
use super::registry::ListenerRegistry;
use super::sink::PaymentSink;
use super::source::BundleAliases;
use crate::config::MonitorConfig;
use crate::error::ActivationError;

/// 通知监听服务
pub struct NotificationService {
    detector: PaymentDetector,
    aliases: BundleAliases,
    gate: Arc<dyn PermissionGate>,
}

impl NotificationService {
    pub fn new(
        detector: PaymentDetector,
        aliases: BundleAliases,
        gate: Arc<dyn PermissionGate>,
    ) -> Self {
        Self {
            detector,
            aliases,
            gate,
        }
    }

    /// 根据配置构建服务，注册表由调用方持有
    pub fn from_config(
        config: &MonitorConfig,
        registry: Arc<ListenerRegistry>,
        gate: Arc<dyn PermissionGate>,
    ) -> Self {
        let detector = PaymentDetector::new(
            config.source_filter(),
            config.keyword_matcher(),
            registry,
        );
        Self::new(detector, config.bundle_aliases(), gate)
    }

    pub fn detector(&self) -> &PaymentDetector {
        &self.detector
    }

    /// 是否已授予通知访问权限
    pub fn is_access_granted(&self) -> bool {
        self.gate.is_access_granted()
    }

    /// 启动监听：权限未授予时拒绝
    pub fn start_listening(&self, sink: Arc<dyn PaymentSink>) -> Result<(), ActivationError> {
        if let Err(err) = self.gate.ensure_access_granted() {
            warn!(sink = sink.name(), "Cannot start listening: permission not granted");
            return Err(err);
        }
        self.detector.registry().start(sink);
        Ok(())
    }

    /// 停止监听
    pub fn stop_listening(&self) {
        self.detector.registry().stop();
    }

    pub fn is_listening(&self) -> bool {
        self.detector.registry().is_active()
    }

    /// 系统投递通知的入口，不会返回错误
    pub fn on_notification_posted(&self, raw: &RawNotification) -> Classification {
        let canonical = self.aliases.canonical(&raw.application_id);
        if canonical != raw.application_id {
            let mut aliased = raw.clone();
            aliased.application_id = canonical.to_string();
            return self.detector.on_notification_posted(&aliased);
        }
        self.detector.on_notification_posted(raw)
    }

    /// 系统监听连接建立
    pub fn on_listener_connected(&self) {
        debug!("Notification listener connected");
    }

    /// 系统监听连接断开
    pub fn on_listener_disconnected(&self) {
        debug!(listening = self.is_listening(), "Notification listener disconnected");
    }
}
