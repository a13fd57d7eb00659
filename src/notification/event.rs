//! 支付事件 - 分类成功后交给订阅方的数据

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::source::app_label;

/// 检测到的支付通知
///
/// 序列化字段名与宿主 UI 约定一致（`packageName` / `title` / `content` / `timestamp`）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEvent {
    /// 来源应用包名
    #[serde(rename = "packageName")]
    pub application_id: String,
    pub title: String,
    pub content: String,
    /// 原通知发布时间（毫秒时间戳）
    #[serde(rename = "timestamp")]
    pub timestamp_millis: i64,
}

impl PaymentEvent {
    pub fn new(
        application_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        timestamp_millis: i64,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            title: title.into(),
            content: content.into(),
            timestamp_millis,
        }
    }

    /// 发布时间，超出范围时返回 `None`
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_millis).single()
    }

    /// 来源应用名称，未知应用返回包名
    pub fn source_label(&self) -> &str {
        app_label(&self.application_id).unwrap_or(&self.application_id)
    }
}
