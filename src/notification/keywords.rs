//! 支付关键词匹配

/// 默认支付关键词
pub const DEFAULT_PAYMENT_KEYWORDS: &[&str] = &[
    "支付", "付款", "收款", "到账", "扣款", "转账", "成功", "￥", "¥", "元",
];

/// 关键词匹配器
///
/// 任一关键词是 `title + " " + content` 小写后的子串即命中。
/// 不做分词，关键词嵌在更长的词里同样算命中：宁可误报，不可漏报。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatcher {
    /// 已小写化的关键词，保持配置顺序
    keywords: Vec<String>,
}

impl KeywordMatcher {
    /// 创建匹配器，空白关键词会被丢弃（空串会匹配一切）
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.trim().is_empty())
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// 是否与支付相关
    pub fn is_payment_related(&self, title: &str, content: &str) -> bool {
        self.first_match(title, content).is_some()
    }

    /// 返回第一个命中的关键词
    pub fn first_match(&self, title: &str, content: &str) -> Option<&str> {
        let combined = format!("{} {}", title, content).to_lowercase();
        self.keywords
            .iter()
            .find(|k| combined.contains(k.as_str()))
            .map(String::as_str)
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_PAYMENT_KEYWORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keywords_match_chinese_payment_text() {
        let matcher = KeywordMatcher::default();
        assert!(matcher.is_payment_related("微信支付", "向商户付款成功 ¥12.00"));
        assert!(matcher.is_payment_related("", "你已成功收款0.01元"));
        assert!(matcher.is_payment_related("支付宝", ""));
    }

    #[test]
    fn test_no_keyword() {
        let matcher = KeywordMatcher::default();
        assert!(!matcher.is_payment_related("群聊", "今晚一起吃饭吗"));
        assert!(!matcher.is_payment_related("", ""));
    }

    #[test]
    fn test_case_insensitive() {
        let matcher = KeywordMatcher::new(["Payment", "RECEIVED"]);
        assert!(matcher.is_payment_related("PAYMENT done", ""));
        assert!(matcher.is_payment_related("", "money received"));
        assert_eq!(matcher.keywords(), &["payment", "received"]);
    }

    #[test]
    fn test_substring_inside_longer_word() {
        let matcher = KeywordMatcher::new(["pay"]);
        assert!(matcher.is_payment_related("Repayment reminder", ""));
    }

    #[test]
    fn test_first_match_follows_configured_order() {
        let matcher = KeywordMatcher::default();
        assert_eq!(matcher.first_match("转账", "支付成功"), Some("支付"));
    }

    #[test]
    fn test_blank_keywords_are_dropped() {
        let matcher = KeywordMatcher::new(["", "  ", "元"]);
        assert_eq!(matcher.keywords(), &["元"]);
        assert!(!matcher.is_payment_related("hello", "world"));
    }

    #[test]
    fn test_keyword_spanning_title_and_content_separator() {
        // 标题和正文之间插入了空格，跨越边界的关键词不会命中
        let matcher = KeywordMatcher::new(["付款"]);
        assert!(!matcher.is_payment_related("付", "款"));
    }
}
