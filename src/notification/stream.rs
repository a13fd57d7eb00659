//! 通知流 - 从 JSON Lines 输入逐行读取通知并交给服务
//!
//! 单行读取失败（非 UTF-8、JSON 无法解析）只跳过该行，后续通知照常处理；
//! 只有底层读取出错才结束整个流。

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use super::raw::RawNotification;
use super::service::NotificationService;
use super::sink::PaymentSink;
use crate::error::WatchError;

/// 流处理统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    /// 非空行数
    pub seen: usize,
    /// 命中的支付通知数
    pub matched: usize,
    /// 被跳过的无效行数
    pub skipped: usize,
}

/// 启动监听并处理整个输入流，读到 EOF 后停止监听
pub async fn watch_stream<R>(
    service: &NotificationService,
    sink: Arc<dyn PaymentSink>,
    reader: R,
) -> Result<WatchSummary, WatchError>
where
    R: AsyncBufRead + Unpin,
{
    service.start_listening(sink)?;
    service.on_listener_connected();

    let result = process_lines(service, reader).await;

    service.stop_listening();
    service.on_listener_disconnected();

    let summary = result?;
    info!(
        seen = summary.seen,
        matched = summary.matched,
        skipped = summary.skipped,
        "Watch finished"
    );
    Ok(summary)
}

async fn process_lines<R>(
    service: &NotificationService,
    mut reader: R,
) -> Result<WatchSummary, WatchError>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = WatchSummary::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                summary.seen += 1;
                summary.skipped += 1;
                warn!(line = summary.seen, error = %e, "Skipping non UTF-8 notification line");
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        summary.seen += 1;

        match serde_json::from_str::<RawNotification>(line) {
            Ok(raw) => {
                if service.on_notification_posted(&raw).is_match() {
                    summary.matched += 1;
                }
            }
            Err(e) => {
                summary.skipped += 1;
                warn!(line = summary.seen, error = %e, "Skipping unparsable notification");
            }
        }
    }

    Ok(summary)
}
