//! 检测器配置
//!
//! 配置读取优先级：
//! 1. 显式传入的路径（CLI `--config`）
//! 2. 环境变量 `PNM_CONFIG`
//! 3. `~/.config/payment-notification-monitor/config.json`
//! 4. 内置默认值（微信 + 支付宝）
//!
//! 显式路径或环境变量指向的文件必须存在；默认位置的文件不存在时使用内置默认值。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;
use crate::notification::keywords::{KeywordMatcher, DEFAULT_PAYMENT_KEYWORDS};
use crate::notification::source::{BundleAliases, SourceFilter, DEFAULT_PAYMENT_APPS};

/// 配置文件路径环境变量
pub const ENV_CONFIG_PATH: &str = "PNM_CONFIG";

/// 检测器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// 支付应用包名
    pub payment_apps: Vec<String>,
    /// 支付关键词
    pub keywords: Vec<String>,
    /// 平台 bundle 名 -> 标准包名
    pub bundle_aliases: BTreeMap<String, String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            payment_apps: DEFAULT_PAYMENT_APPS.iter().map(|s| s.to_string()).collect(),
            keywords: DEFAULT_PAYMENT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            bundle_aliases: BundleAliases::platform_defaults().into_map(),
        }
    }
}

impl MonitorConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| {
            home.join(".config")
                .join("payment-notification-monitor")
                .join("config.json")
        })
    }

    /// 按优先级加载配置
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var(ENV_CONFIG_PATH).ok();
        Self::load_from(explicit, env_path.as_deref(), Self::default_path())
    }

    fn load_from(
        explicit: Option<&Path>,
        env_path: Option<&str>,
        default_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(path) = env_path.filter(|p| !p.is_empty()) {
            return Self::from_file(Path::new(path));
        }

        match default_path {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// 从 JSON 文件读取
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config.normalized())
    }

    /// 去掉空白关键词和空包名
    fn normalized(mut self) -> Self {
        self.keywords.retain(|k| !k.trim().is_empty());
        self.payment_apps.retain(|a| !a.is_empty());
        self
    }

    pub fn source_filter(&self) -> SourceFilter {
        SourceFilter::new(self.payment_apps.iter().cloned())
    }

    pub fn keyword_matcher(&self) -> KeywordMatcher {
        KeywordMatcher::new(&self.keywords)
    }

    pub fn bundle_aliases(&self) -> BundleAliases {
        BundleAliases::new(self.bundle_aliases.clone())
    }
}
