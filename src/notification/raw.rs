//! 原始通知 - 系统通知框架投递的通知数据
//!
//! 系统层给出的是一个按字符串键取值的松散载荷（Android 的 extras）。
//! 这里在边界上把它转换成带类型的可选字段记录，后续的提取逻辑只处理 `Option`。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::PayloadError;

/// 通知标题
pub const EXTRA_TITLE: &str = "android.title";
/// 主文本
pub const EXTRA_TEXT: &str = "android.text";
/// 展开后的大文本
pub const EXTRA_BIG_TEXT: &str = "android.bigText";
/// 子文本
pub const EXTRA_SUB_TEXT: &str = "android.subText";
/// 信息行（消息样式通知）
pub const EXTRA_TEXT_LINES: &str = "android.textLines";

/// 载荷中单个字段的取值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// 字段存在但值为空（null）
    Absent,
    /// 单段文本
    Text(String),
    /// 有序的多行文本，单行也可能为空
    Lines(Vec<Option<String>>),
    /// 其他类型的值（布尔、数字、对象等），如 `android.showWhen`
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::Lines(lines.into_iter().map(|l| Some(l.into())).collect())
    }
}

/// 通知载荷：字段名 -> 字段值
pub type Extras = BTreeMap<String, FieldValue>;

/// 一条系统通知事件（只在一次分类过程中存在）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNotification {
    /// 发出通知的应用包名
    #[serde(alias = "packageName")]
    pub application_id: String,
    /// 通知发布时间（毫秒时间戳）
    #[serde(alias = "postTime", default)]
    pub posted_at_millis: i64,
    /// 通知载荷，`None` 表示系统没有给出载荷
    #[serde(default)]
    pub extras: Option<Extras>,
}

impl RawNotification {
    /// 创建空载荷的通知
    pub fn new(application_id: impl Into<String>, posted_at_millis: i64) -> Self {
        Self {
            application_id: application_id.into(),
            posted_at_millis,
            extras: Some(Extras::new()),
        }
    }

    /// 创建没有载荷的通知
    pub fn without_extras(application_id: impl Into<String>, posted_at_millis: i64) -> Self {
        Self {
            application_id: application_id.into(),
            posted_at_millis,
            extras: None,
        }
    }

    /// 设置字段
    pub fn with_field(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.extras
            .get_or_insert_with(Extras::new)
            .insert(key.into(), value);
        self
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_field(EXTRA_TITLE, FieldValue::text(title))
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_field(EXTRA_TEXT, FieldValue::text(text))
    }

    pub fn with_big_text(self, text: impl Into<String>) -> Self {
        self.with_field(EXTRA_BIG_TEXT, FieldValue::text(text))
    }

    pub fn with_sub_text(self, text: impl Into<String>) -> Self {
        self.with_field(EXTRA_SUB_TEXT, FieldValue::text(text))
    }

    pub fn with_text_lines<I, S>(self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_field(EXTRA_TEXT_LINES, FieldValue::lines(lines))
    }

    /// 转换为带类型的字段记录
    pub fn fields(&self) -> Result<NotificationFields, PayloadError> {
        let extras = self.extras.as_ref().ok_or(PayloadError::MissingExtras)?;
        NotificationFields::try_from(extras)
    }
}

/// 带类型的通知字段，缺失即 `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationFields {
    pub title: Option<String>,
    pub text: Option<String>,
    pub big_text: Option<String>,
    pub sub_text: Option<String>,
    pub text_lines: Option<Vec<Option<String>>>,
}

impl TryFrom<&Extras> for NotificationFields {
    type Error = PayloadError;

    fn try_from(extras: &Extras) -> Result<Self, Self::Error> {
        Ok(Self {
            title: text_field(extras, EXTRA_TITLE)?,
            text: text_field(extras, EXTRA_TEXT)?,
            big_text: text_field(extras, EXTRA_BIG_TEXT)?,
            sub_text: text_field(extras, EXTRA_SUB_TEXT)?,
            text_lines: lines_field(extras, EXTRA_TEXT_LINES)?,
        })
    }
}

fn text_field(extras: &Extras, key: &'static str) -> Result<Option<String>, PayloadError> {
    match extras.get(key) {
        None | Some(FieldValue::Absent) => Ok(None),
        Some(FieldValue::Text(s)) => Ok(Some(s.clone())),
        Some(FieldValue::Lines(_)) | Some(FieldValue::Other(_)) => Err(PayloadError::WrongShape {
            field: key,
            expected: "text",
        }),
    }
}

fn lines_field(
    extras: &Extras,
    key: &'static str,
) -> Result<Option<Vec<Option<String>>>, PayloadError> {
    match extras.get(key) {
        None | Some(FieldValue::Absent) => Ok(None),
        Some(FieldValue::Lines(lines)) => Ok(Some(lines.clone())),
        Some(FieldValue::Text(_)) | Some(FieldValue::Other(_)) => Err(PayloadError::WrongShape {
            field: key,
            expected: "text lines",
        }),
    }
}
