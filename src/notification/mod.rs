//! 支付通知识别 - 从系统通知流中识别支付通知
//!
//! # 处理流程
//! 1. 来源过滤：只处理已知支付应用（`SourceFilter`）
//! 2. 字段提取：合并标题、正文、大文本、子文本、信息行（`extract`）
//! 3. 关键词匹配：大小写不敏感的子串匹配（`KeywordMatcher`）
//! 4. 事件投递：交给当前唯一的 sink（`ListenerRegistry`）
//!
//! # 使用示例
//! ```ignore
//! use payment_notification_monitor::notification::{
//!     ListenerRegistry, LogSink, PaymentDetector, RawNotification,
//! };
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ListenerRegistry::new());
//! registry.start(Arc::new(LogSink));
//!
//! let detector = PaymentDetector::with_defaults(registry);
//! let raw = RawNotification::new("com.tencent.mm", 1_700_000_000_000)
//!     .with_title("微信支付")
//!     .with_text("向商户付款成功 ¥12.00");
//! detector.on_notification_posted(&raw);
//! ```

pub mod detector;
pub mod event;
pub mod extractor;
pub mod keywords;
pub mod permission;
pub mod raw;
pub mod registry;
pub mod service;
pub mod sink;
pub mod source;
pub mod stream;

pub use detector::{Classification, NoMatchReason, PaymentDetector};
pub use event::PaymentEvent;
pub use extractor::{extract, ExtractedText};
pub use keywords::KeywordMatcher;
pub use permission::{EnabledListenersGate, PermissionGate, StaticGate};
pub use raw::{FieldValue, NotificationFields, RawNotification};
pub use registry::ListenerRegistry;
pub use service::NotificationService;
pub use sink::{DeliveryOutcome, FnSink, JsonLineSink, LogSink, PaymentSink};
pub use source::{BundleAliases, SourceFilter};
pub use stream::{watch_stream, WatchSummary};
