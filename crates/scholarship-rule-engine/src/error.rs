//! 规则引擎错误类型
//!
//! 只用于规则集的解析阶段；条件评估和规则选择本身从不返回错误，
//! 无法评估的条件一律视为不匹配。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("规则解析失败: {0}")]
    ParseError(String),

    #[error("规则集结构无效: {0}")]
    InvalidRuleset(String),

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RuleError>;
