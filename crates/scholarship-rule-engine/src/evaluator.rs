//! 条件评估器
//!
//! 对单个 `[field, operator, value]` 条件求值。任何无法评估的情况
//! （三元组形状不对、字段不存在、字面量无法转换为数字、未知操作符）
//! 都视为不匹配，而不是错误：配置有误的规则应当失败关闭。

use crate::models::{Condition, FactComparison, Facts, Literal};
use crate::operators::Operator;
use serde_json::Value;
use std::fmt;

/// 单个条件的评估结果
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionOutcome {
    /// 比较成立
    Matched(FactComparison),
    /// 比较已执行但不成立
    Unmatched(FactComparison),
    /// 条件不是三元组
    Malformed,
    /// 事实中没有该字段
    FieldNotFound(String),
    /// 字面量无法转换为数字
    NotComparable { field: String, literal: Value },
    /// 操作符符号无法识别
    UnknownOperator(String),
}

impl ConditionOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

impl fmt::Display for ConditionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched(cmp) => write!(f, "{} => MATCHED", cmp),
            Self::Unmatched(cmp) => write!(f, "{} => NOT_MATCHED", cmp),
            Self::Malformed => write!(f, "条件格式无效 => NOT_MATCHED"),
            Self::FieldNotFound(field) => write!(f, "字段不存在: {} => NOT_MATCHED", field),
            Self::NotComparable { field, literal } => {
                write!(f, "{}: 字面量 {} 无法比较 => NOT_MATCHED", field, literal)
            }
            Self::UnknownOperator(op) => write!(f, "未知操作符: '{}' => NOT_MATCHED", op),
        }
    }
}

/// 条件评估器
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// 评估条件，返回是否匹配
    pub fn evaluate(condition: &Condition, facts: &Facts) -> bool {
        Self::check(condition, facts).is_matched()
    }

    /// 评估条件并返回详细结果
    ///
    /// 检查顺序：形状 -> 字段 -> 字面量 -> 操作符。
    pub fn check(condition: &Condition, facts: &Facts) -> ConditionOutcome {
        let (field, operator, value) = match condition {
            Condition::Compare {
                field,
                operator,
                value,
            } => (field, operator, value),
            Condition::Malformed(_) => return ConditionOutcome::Malformed,
        };

        let Some(actual) = facts.get(field) else {
            return ConditionOutcome::FieldNotFound(field.clone());
        };

        // 只支持数值比较：文本字面量与数值事实之间没有可比语义
        let Some(threshold) = Literal::coerce(value).and_then(|lit| lit.as_number()) else {
            return ConditionOutcome::NotComparable {
                field: field.clone(),
                literal: value.clone(),
            };
        };

        let Some(op) = Operator::from_symbol(operator) else {
            return ConditionOutcome::UnknownOperator(operator.clone());
        };

        let comparison = FactComparison {
            field: field.clone(),
            operator: op,
            threshold,
            actual,
        };

        if op.compare(actual, threshold) {
            ConditionOutcome::Matched(comparison)
        } else {
            ConditionOutcome::Unmatched(comparison)
        }
    }
}
