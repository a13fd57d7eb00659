//! 事件投递目标（sink）trait 及内置实现

use anyhow::Result;
use std::io::Write;
use std::sync::Mutex;
use tracing::info;

use super::event::PaymentEvent;

/// 投递结果
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    /// 已交给 sink
    Delivered,
    /// 没有注册 sink，事件被丢弃
    NoSink,
    /// sink 处理失败（已被拦截，不会向上传播）
    Failed(String),
}

/// 支付事件接收方
pub trait PaymentSink: Send + Sync {
    /// sink 名称（用于日志）
    fn name(&self) -> &str;

    /// 同步处理一个事件
    fn deliver(&self, event: &PaymentEvent) -> Result<()>;
}

/// 闭包 sink
pub struct FnSink<F> {
    name: String,
    f: F,
}

impl<F> FnSink<F>
where
    F: Fn(&PaymentEvent) -> Result<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> PaymentSink for FnSink<F>
where
    F: Fn(&PaymentEvent) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn deliver(&self, event: &PaymentEvent) -> Result<()> {
        (self.f)(event)
    }
}

/// 日志 sink - 只记录事件
pub struct LogSink;

impl PaymentSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn deliver(&self, event: &PaymentEvent) -> Result<()> {
        info!(
            app_id = %event.application_id,
            source = event.source_label(),
            timestamp = event.timestamp_millis,
            "Payment notification detected"
        );
        Ok(())
    }
}

/// JSON Lines sink - 每个事件写一行 JSON
pub struct JsonLineSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLineSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// 取回底层 writer
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> PaymentSink for JsonLineSink<W> {
    fn name(&self) -> &str {
        "json_line"
    }

    fn deliver(&self, event: &PaymentEvent) -> Result<()> {
        let line = serde_json::to_string(event)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("json_line writer lock poisoned"))?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}
