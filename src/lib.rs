//! Payment Notification Monitor - 从系统通知中识别支付通知

pub mod config;
pub mod error;
pub mod notification;

pub use config::MonitorConfig;
pub use error::{ActivationError, ConfigError, PayloadError, WatchError};
pub use notification::{
    Classification, DeliveryOutcome, EnabledListenersGate, FnSink, JsonLineSink,
    ListenerRegistry, LogSink, NoMatchReason, NotificationService, PaymentDetector,
    PaymentEvent, PaymentSink, PermissionGate, RawNotification, StaticGate, WatchSummary,
};
