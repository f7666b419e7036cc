//! 响应 DTO 定义

use std::collections::BTreeSet;

use rule_engine::Ruleset;
use serde::Serialize;

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self::success_with_message(data, "操作成功")
    }

    /// 创建成功响应（自定义消息）
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

/// 当前生效的规则集
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesetDto {
    /// 规则来源：文件路径，或内置默认规则时为 None
    pub source: Option<String>,
    pub count: usize,
    /// 规则集引用到的全部事实字段
    pub required_fields: BTreeSet<String>,
    pub rules: Ruleset,
}

impl RulesetDto {
    pub fn new(ruleset: &Ruleset, source: Option<String>) -> Self {
        Self {
            source,
            count: ruleset.len(),
            required_fields: ruleset.required_fields(),
            rules: ruleset.clone(),
        }
    }
}
