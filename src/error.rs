//! 错误类型
//!
//! 分类路径本身从不向外抛错（见 `Classification`），这里只定义库边界上真正需要
//! 调用方处理的错误：配置加载、监听激活、以及载荷解析的内部错误。

use std::path::PathBuf;
use thiserror::Error;

/// 配置加载错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 启动监听失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivationError {
    /// 用户尚未授予通知访问权限
    #[error("Notification listener access has not been granted")]
    PermissionDenied,
}

impl ActivationError {
    /// 与宿主 UI 约定的错误码
    pub fn code(&self) -> &'static str {
        match self {
            ActivationError::PermissionDenied => "PERMISSION_DENIED",
        }
    }
}

/// 通知流处理失败
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("{0} ({code})", code = .0.code())]
    Activation(#[from] ActivationError),

    #[error("Failed to read notification stream: {0}")]
    Io(#[from] std::io::Error),
}

/// 通知载荷格式错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Notification has no extras payload")]
    MissingExtras,

    #[error("Field {field} expected {expected}")]
    WrongShape {
        field: &'static str,
        expected: &'static str,
    },
}
