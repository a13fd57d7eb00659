//! 支付通知检测器 - 来源过滤 → 字段提取 → 关键词匹配
//!
//! `classify` 是纯函数：结果只取决于单条通知和两份不可变配置，不记忆历史通知。

use std::sync::Arc;
use tracing::debug;

use super::event::PaymentEvent;
use super::extractor::extract;
use super::keywords::KeywordMatcher;
use super::raw::RawNotification;
use super::registry::ListenerRegistry;
use super::sink::DeliveryOutcome;
use super::source::SourceFilter;

/// 未命中的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatchReason {
    /// 不是已知支付应用
    UnrecognizedSource,
    /// 文本中没有支付关键词
    NoKeyword,
}

/// 分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// 支付通知
    Match(PaymentEvent),
    /// 确定不是支付通知
    NoMatch(NoMatchReason),
    /// 载荷无法解析，按未命中处理
    Malformed(String),
}

impl Classification {
    pub fn is_match(&self) -> bool {
        matches!(self, Classification::Match(_))
    }

    pub fn event(&self) -> Option<&PaymentEvent> {
        match self {
            Classification::Match(event) => Some(event),
            _ => None,
        }
    }

    pub fn into_event(self) -> Option<PaymentEvent> {
        match self {
            Classification::Match(event) => Some(event),
            _ => None,
        }
    }
}

/// 支付通知检测器
pub struct PaymentDetector {
    sources: SourceFilter,
    keywords: KeywordMatcher,
    registry: Arc<ListenerRegistry>,
}

impl PaymentDetector {
    pub fn new(
        sources: SourceFilter,
        keywords: KeywordMatcher,
        registry: Arc<ListenerRegistry>,
    ) -> Self {
        Self {
            sources,
            keywords,
            registry,
        }
    }

    /// 使用默认支付应用和关键词
    pub fn with_defaults(registry: Arc<ListenerRegistry>) -> Self {
        Self::new(SourceFilter::default(), KeywordMatcher::default(), registry)
    }

    pub fn registry(&self) -> &Arc<ListenerRegistry> {
        &self.registry
    }

    /// 分类一条通知，不产生副作用
    pub fn classify(&self, raw: &RawNotification) -> Classification {
        // 先过滤来源，无关应用的通知不做任何提取
        if !self.sources.is_recognized_source(&raw.application_id) {
            return Classification::NoMatch(NoMatchReason::UnrecognizedSource);
        }

        let fields = match raw.fields() {
            Ok(fields) => fields,
            Err(e) => {
                debug!(app_id = %raw.application_id, error = %e, "Malformed notification payload");
                return Classification::Malformed(e.to_string());
            }
        };

        let extracted = extract(&fields);

        match self.keywords.first_match(&extracted.title, &extracted.content) {
            Some(keyword) => {
                debug!(
                    app_id = %raw.application_id,
                    keyword,
                    title = %extracted.title,
                    content = %extracted.content,
                    "Payment keyword matched"
                );
                Classification::Match(PaymentEvent::new(
                    raw.application_id.clone(),
                    extracted.title,
                    extracted.content,
                    raw.posted_at_millis,
                ))
            }
            None => Classification::NoMatch(NoMatchReason::NoKeyword),
        }
    }

    /// 处理系统投递的通知：分类，命中时交给当前 sink 一次
    pub fn on_notification_posted(&self, raw: &RawNotification) -> Classification {
        let classification = self.classify(raw);
        if let Classification::Match(event) = &classification {
            if let DeliveryOutcome::Delivered = self.registry.deliver(event.clone()) {
                debug!(app_id = %event.application_id, "Payment event delivered");
            }
        }
        classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::raw::{FieldValue, EXTRA_TITLE};
    use crate::notification::sink::{FnSink, PaymentSink};
    use anyhow::Result;
    use std::sync::Mutex;

    fn detector() -> PaymentDetector {
        PaymentDetector::with_defaults(Arc::new(ListenerRegistry::new()))
    }

    #[test]
    fn test_wechat_payment_matches() {
        let raw = RawNotification::new("com.tencent.mm", 1_700_000_000_000)
            .with_title("微信支付")
            .with_text("向商户付款成功 ¥12.00");

        let event = detector().classify(&raw).into_event().unwrap();
        assert_eq!(event.application_id, "com.tencent.mm");
        assert_eq!(event.title, "微信支付");
        assert_eq!(event.content, "向商户付款成功 ¥12.00");
        assert_eq!(event.timestamp_millis, 1_700_000_000_000);
    }

    #[test]
    fn test_unrecognized_source_rejected_before_keywords() {
        let raw = RawNotification::new("com.other.app", 1).with_title("支付成功");
        assert_eq!(
            detector().classify(&raw),
            Classification::NoMatch(NoMatchReason::UnrecognizedSource)
        );
    }

    #[test]
    fn test_unrecognized_source_skips_payload_parsing() {
        // 非支付应用即使载荷格式错误也只报告来源不匹配
        let raw = RawNotification::without_extras("com.other.app", 1);
        assert_eq!(
            detector().classify(&raw),
            Classification::NoMatch(NoMatchReason::UnrecognizedSource)
        );
    }

    #[test]
    fn test_no_keyword() {
        let raw = RawNotification::new("com.tencent.mm", 1)
            .with_title("张三")
            .with_text("晚上一起吃饭？");
        assert_eq!(
            detector().classify(&raw),
            Classification::NoMatch(NoMatchReason::NoKeyword)
        );
    }

    #[test]
    fn test_missing_extras_is_malformed() {
        let raw = RawNotification::without_extras("com.tencent.mm", 1);
        let classification = detector().classify(&raw);
        assert!(matches!(classification, Classification::Malformed(_)));
        assert!(classification.into_event().is_none());
    }

    #[test]
    fn test_wrong_field_shape_is_malformed() {
        let raw = RawNotification::new("com.tencent.mm", 1)
            .with_field(EXTRA_TITLE, FieldValue::lines(["支付"]));
        assert!(matches!(detector().classify(&raw), Classification::Malformed(_)));
    }

    #[test]
    fn test_all_absent_fields_do_not_match() {
        let raw = RawNotification::new("com.eg.android.AlipayGphone", 1);
        assert_eq!(
            detector().classify(&raw),
            Classification::NoMatch(NoMatchReason::NoKeyword)
        );
    }

    #[test]
    fn test_classify_is_idempotent() {
        let detector = detector();
        let raw = RawNotification::new("com.eg.android.AlipayGphone", 7)
            .with_title("支付宝")
            .with_text("你已成功收款1.00元");
        assert_eq!(detector.classify(&raw), detector.classify(&raw));
    }

    #[test]
    fn test_classify_does_not_deliver() {
        let detector = detector();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink_received = Arc::clone(&received);
        let sink: Arc<dyn PaymentSink> = Arc::new(FnSink::new(
            "collect",
            move |e: &PaymentEvent| -> Result<()> {
                sink_received.lock().unwrap().push(e.clone());
                Ok(())
            },
        ));
        detector.registry().start(sink);

        let raw = RawNotification::new("com.tencent.mm", 1).with_title("微信支付");
        assert!(detector.classify(&raw).is_match());
        assert!(received.lock().unwrap().is_empty());

        assert!(detector.on_notification_posted(&raw).is_match());
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_no_match_is_not_delivered() {
        let detector = detector();
        let received = Arc::new(Mutex::new(0usize));
        let sink_received = Arc::clone(&received);
        detector.registry().start(Arc::new(FnSink::new(
            "count",
            move |_e: &PaymentEvent| -> Result<()> {
                *sink_received.lock().unwrap() += 1;
                Ok(())
            },
        )));

        let raw = RawNotification::new("com.other.app", 1).with_title("支付成功");
        detector.on_notification_posted(&raw);
        assert_eq!(*received.lock().unwrap(), 0);
    }
}
