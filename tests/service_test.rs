use payment_notification_monitor::{
    ActivationError, EnabledListenersGate, JsonLineSink, ListenerRegistry, MonitorConfig,
    NotificationService, PaymentEvent, RawNotification, StaticGate,
};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// 共享缓冲区，便于在 sink 被注册表持有时读取输出
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn events(&self) -> Vec<PaymentEvent> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }
}

#[test]
fn test_activation_with_enabled_listeners_setting() {
    let gate = EnabledListenersGate::new(
        "com.whereismymoney",
        "com.whereismymoney/com.whereismymoney.PaymentNotificationService",
    );
    let service = NotificationService::from_config(
        &MonitorConfig::default(),
        Arc::new(ListenerRegistry::new()),
        Arc::new(gate),
    );
    assert!(service.is_access_granted());

    let buffer = SharedBuffer::default();
    service
        .start_listening(Arc::new(JsonLineSink::new(buffer.clone())))
        .unwrap();

    let stream = vec![
        RawNotification::new("com.tencent.mm", 1).with_title("张三").with_text("在吗"),
        RawNotification::new("com.tencent.mm", 2)
            .with_title("微信支付")
            .with_text("微信支付收款0.01元"),
        RawNotification::new("com.android.systemui", 3).with_title("支付"),
        RawNotification::without_extras("com.eg.android.AlipayGphone", 4),
        RawNotification::new("com.eg.android.AlipayGphone", 5)
            .with_title("支付宝通知")
            .with_text("成功收款10.00元"),
    ];

    let matched = stream
        .iter()
        .filter(|raw| service.on_notification_posted(raw).is_match())
        .count();
    assert_eq!(matched, 2);

    let events = buffer.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].timestamp_millis, 2);
    assert_eq!(events[1].application_id, "com.eg.android.AlipayGphone");
    assert_eq!(events[1].content, "成功收款10.00元");
}

#[test]
fn test_permission_denied_leaves_registry_idle() {
    let registry = Arc::new(ListenerRegistry::new());
    let service = NotificationService::from_config(
        &MonitorConfig::default(),
        Arc::clone(&registry),
        Arc::new(EnabledListenersGate::new("com.whereismymoney", "")),
    );

    let err = service
        .start_listening(Arc::new(JsonLineSink::new(SharedBuffer::default())))
        .unwrap_err();
    assert_eq!(err, ActivationError::PermissionDenied);
    assert_eq!(err.code(), "PERMISSION_DENIED");
    assert!(!registry.is_active());
}

#[test]
fn test_custom_config_drives_detection() {
    let config: MonitorConfig = serde_json::from_str(
        r#"{"payment_apps": ["com.bank.mobile"], "keywords": ["debited"], "bundle_aliases": {}}"#,
    )
    .unwrap();
    let service = NotificationService::from_config(
        &config,
        Arc::new(ListenerRegistry::new()),
        Arc::new(StaticGate(true)),
    );

    let bank = RawNotification::new("com.bank.mobile", 1).with_text("USD 20 DEBITED from card");
    let wechat = RawNotification::new("com.tencent.mm", 1).with_title("微信支付");
    assert!(service.on_notification_posted(&bank).is_match());
    assert!(!service.on_notification_posted(&wechat).is_match());
}
