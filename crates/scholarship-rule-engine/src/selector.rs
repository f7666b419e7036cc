//! 规则选择器
//!
//! 按优先级从高到低依次评估规则，返回第一条所有条件都成立的规则。
//! 同优先级的规则保持原始顺序；命中后立即短路，不再评估后续规则。

use crate::evaluator::{ConditionEvaluator, ConditionOutcome};
use crate::models::{FactComparison, Facts, Rule, RuleMatch, SelectionResult};
use std::cmp::Reverse;
use tracing::debug;

/// 规则选择器
pub struct RuleSelector {
    /// 是否记录详细评估追踪
    trace_enabled: bool,
}

impl RuleSelector {
    pub fn new() -> Self {
        Self {
            trace_enabled: false,
        }
    }

    /// 启用评估追踪
    pub fn with_trace(mut self) -> Self {
        self.trace_enabled = true;
        self
    }

    /// 选择第一条匹配的规则
    ///
    /// 排序在引用副本上进行，调用方持有的 `rules` 不会被修改。
    pub fn select(&self, rules: &[Rule], facts: &Facts) -> SelectionResult {
        let mut ordered: Vec<&Rule> = rules.iter().collect();
        // sort_by_key 是稳定排序，同优先级保持原始顺序
        ordered.sort_by_key(|rule| Reverse(rule.priority));

        let mut result = SelectionResult::default();

        for rule in ordered {
            result.evaluated_rules += 1;

            if let Some(matched_facts) = self.match_rule(rule, facts, &mut result.evaluation_trace)
            {
                debug!(
                    rule_name = %rule.name,
                    priority = rule.priority,
                    decision = %rule.action.decision,
                    "规则命中"
                );

                result.matched = Some(RuleMatch {
                    rule_name: rule.name.clone(),
                    priority: rule.priority,
                    action: rule.action.clone(),
                    conditions: rule.conditions.clone(),
                    matched_facts,
                });
                return result;
            }
        }

        debug!(evaluated_rules = result.evaluated_rules, "没有规则命中");
        result
    }

    /// 评估一条规则的全部条件（AND，短路）
    ///
    /// 全部成立时返回逐条比较明细；空条件列表恒成立。
    fn match_rule(
        &self,
        rule: &Rule,
        facts: &Facts,
        trace: &mut Vec<String>,
    ) -> Option<Vec<FactComparison>> {
        if self.trace_enabled {
            trace.push(format!(
                "规则 '{}' (priority {}): 开始评估 {} 个条件",
                rule.name,
                rule.priority,
                rule.conditions.len()
            ));
        }

        let mut matched = Vec::with_capacity(rule.conditions.len());

        for (i, condition) in rule.conditions.iter().enumerate() {
            let outcome = ConditionEvaluator::check(condition, facts);

            if self.trace_enabled {
                trace.push(format!("  conditions[{}]: {}", i, outcome));
            }

            match outcome {
                ConditionOutcome::Matched(comparison) => matched.push(comparison),
                _ => {
                    if self.trace_enabled {
                        trace.push(format!("  AND 短路 - 条件 {} 不匹配", i));
                    }
                    return None;
                }
            }
        }

        if self.trace_enabled {
            trace.push(format!("  规则 '{}' 全部匹配", rule.name));
        }

        Some(matched)
    }
}

impl Default for RuleSelector {
    fn default() -> Self {
        Self::new()
    }
}
