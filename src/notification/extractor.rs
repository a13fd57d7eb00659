//! 通知字段提取 - 把多个文本字段合并为标题 + 正文

use super::raw::NotificationFields;

/// 提取结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub title: String,
    pub content: String,
}

/// 提取标题和正文
///
/// 正文按固定顺序拼接，非空部分之间用单个空格分隔：
/// 1. 主文本
/// 2. 大文本（与主文本完全相同时跳过）
/// 3. 子文本
/// 4. 信息行，每行一段，保持原顺序
///
/// 大文本去重只做精确比较，仅空白或大小写不同也视为不同内容。
pub fn extract(fields: &NotificationFields) -> ExtractedText {
    let title = fields.title.clone().unwrap_or_default();

    let mut parts: Vec<&str> = Vec::new();

    if let Some(text) = fields.text.as_deref() {
        parts.push(text);
    }

    if let Some(big_text) = fields.big_text.as_deref() {
        if fields.text.as_deref() != Some(big_text) {
            parts.push(big_text);
        }
    }

    if let Some(sub_text) = fields.sub_text.as_deref() {
        parts.push(sub_text);
    }

    if let Some(lines) = &fields.text_lines {
        parts.extend(lines.iter().flatten().map(String::as_str));
    }

    let content = join_non_empty(&parts);

    ExtractedText { title, content }
}

fn join_non_empty(parts: &[&str]) -> String {
    let mut out = String::new();
    for part in parts.iter().filter(|p| !p.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}
