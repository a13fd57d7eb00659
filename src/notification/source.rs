//! 支付应用来源过滤

use std::collections::{BTreeMap, HashSet};

/// 微信
pub const WECHAT_PACKAGE: &str = "com.tencent.mm";
/// 支付宝
pub const ALIPAY_PACKAGE: &str = "com.eg.android.AlipayGphone";
/// 鸿蒙版支付宝的 bundle 名
pub const ALIPAY_HARMONY_BUNDLE: &str = "com.alipay.mobile.client";

/// 默认支付应用
pub const DEFAULT_PAYMENT_APPS: &[&str] = &[WECHAT_PACKAGE, ALIPAY_PACKAGE];

/// 支付应用集合，包名精确匹配（区分大小写、不去空白、不支持通配）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFilter {
    apps: HashSet<String>,
}

impl SourceFilter {
    pub fn new<I, S>(apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            apps: apps.into_iter().map(Into::into).collect(),
        }
    }

    /// 是否为已知支付应用
    pub fn is_recognized_source(&self, application_id: &str) -> bool {
        self.apps.contains(application_id)
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl Default for SourceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_PAYMENT_APPS.iter().copied())
    }
}

/// 应用名称（用于展示）
pub fn app_label(application_id: &str) -> Option<&'static str> {
    match application_id {
        WECHAT_PACKAGE => Some("微信"),
        ALIPAY_PACKAGE => Some("支付宝"),
        _ => None,
    }
}

/// 包名别名表
///
/// 部分平台（如鸿蒙）上报的 bundle 名与 Android 包名不同，进入分类前先换成标准包名。
/// 来源过滤本身仍是精确匹配。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleAliases {
    aliases: BTreeMap<String, String>,
}

impl BundleAliases {
    pub fn new(aliases: BTreeMap<String, String>) -> Self {
        Self { aliases }
    }

    /// 默认别名：鸿蒙版支付宝
    pub fn platform_defaults() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert(ALIPAY_HARMONY_BUNDLE.to_string(), ALIPAY_PACKAGE.to_string());
        Self { aliases }
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.aliases
    }

    /// 转换为标准包名，未登记的原样返回
    pub fn canonical<'a>(&'a self, application_id: &'a str) -> &'a str {
        self.aliases
            .get(application_id)
            .map(String::as_str)
            .unwrap_or(application_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_apps_recognized() {
        let filter = SourceFilter::default();
        assert!(filter.is_recognized_source("com.tencent.mm"));
        assert!(filter.is_recognized_source("com.eg.android.AlipayGphone"));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_exact_match_only() {
        let filter = SourceFilter::default();
        assert!(!filter.is_recognized_source("com.other.app"));
        assert!(!filter.is_recognized_source("COM.TENCENT.MM"));
        assert!(!filter.is_recognized_source(" com.tencent.mm"));
        assert!(!filter.is_recognized_source("com.tencent.mm.plugin"));
        assert!(!filter.is_recognized_source("com.tencent"));
        assert!(!filter.is_recognized_source(""));
    }

    #[test]
    fn test_empty_filter_rejects_everything() {
        let filter = SourceFilter::new(Vec::<String>::new());
        assert!(filter.is_empty());
        assert!(!filter.is_recognized_source("com.tencent.mm"));
    }

    #[test]
    fn test_app_label() {
        assert_eq!(app_label(WECHAT_PACKAGE), Some("微信"));
        assert_eq!(app_label(ALIPAY_PACKAGE), Some("支付宝"));
        assert_eq!(app_label("com.other.app"), None);
    }

    #[test]
    fn test_bundle_aliases() {
        let aliases = BundleAliases::platform_defaults();
        assert_eq!(aliases.canonical(ALIPAY_HARMONY_BUNDLE), ALIPAY_PACKAGE);
        assert_eq!(aliases.canonical(WECHAT_PACKAGE), WECHAT_PACKAGE);
        assert_eq!(aliases.canonical("com.other.app"), "com.other.app");
    }
}
