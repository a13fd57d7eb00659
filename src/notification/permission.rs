//! 通知访问权限检查

use crate::error::ActivationError;

/// 权限检查接口，由宿主平台实现
pub trait PermissionGate: Send + Sync {
    /// 是否已授予通知监听权限
    fn is_access_granted(&self) -> bool;

    /// 未授权时返回 `PermissionDenied`
    fn ensure_access_granted(&self) -> Result<(), ActivationError> {
        if self.is_access_granted() {
            Ok(())
        } else {
            Err(ActivationError::PermissionDenied)
        }
    }
}

/// 固定结果的权限检查
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticGate(pub bool);

impl PermissionGate for StaticGate {
    fn is_access_granted(&self) -> bool {
        self.0
    }
}

/// 基于系统设置 `enabled_notification_listeners` 的权限检查
///
/// 设置值是用冒号分隔的组件名列表，每项形如 `com.example/.ListenerService`，
/// 只要有一项的包名与本应用包名完全一致即视为已授权。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnabledListenersGate {
    own_package: String,
    enabled_listeners: String,
}

impl EnabledListenersGate {
    pub fn new(own_package: impl Into<String>, enabled_listeners: impl Into<String>) -> Self {
        Self {
            own_package: own_package.into(),
            enabled_listeners: enabled_listeners.into(),
        }
    }

    /// 列出已启用监听器的包名（忽略无法解析的项）
    pub fn enabled_packages(&self) -> impl Iterator<Item = &str> {
        self.enabled_listeners
            .split(':')
            .filter_map(component_package)
    }
}

impl PermissionGate for EnabledListenersGate {
    fn is_access_granted(&self) -> bool {
        self.enabled_packages().any(|pkg| pkg == self.own_package)
    }
}

/// 从 `pkg/class` 形式的组件名中取出包名
fn component_package(flat: &str) -> Option<&str> {
    let (pkg, class) = flat.split_once('/')?;
    if pkg.is_empty() || class.is_empty() {
        return None;
    }
    Some(pkg)
}
