//! 奖学金规则引擎
//!
//! 根据按优先级排列的规则和申请人事实给出唯一的奖学金决策：
//! - 条件评估：`[field, operator, value]` 三元组，字面量类型转换，失败关闭
//! - 规则选择：按优先级降序（稳定排序），返回第一条全部条件成立的规则
//!
//! 引擎是纯函数，不在两次评估之间保留任何状态。

pub mod defaults;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod operators;
pub mod ruleset;
pub mod selector;

pub use defaults::DEFAULT_RULES_JSON;
pub use error::{Result, RuleError};
pub use evaluator::{ConditionEvaluator, ConditionOutcome};
pub use models::{
    Action, ApplicantProfile, Condition, Decision, FactComparison, Facts, Literal, Rule,
    RuleMatch, SelectionResult, fields,
};
pub use operators::Operator;
pub use ruleset::Ruleset;
pub use selector::RuleSelector;

/// 评估单个条件
pub fn evaluate(condition: &Condition, facts: &Facts) -> bool {
    ConditionEvaluator::evaluate(condition, facts)
}

/// 选择第一条匹配的规则（不记录追踪）
pub fn select(rules: &[Rule], facts: &Facts) -> SelectionResult {
    RuleSelector::new().select(rules, facts)
}
