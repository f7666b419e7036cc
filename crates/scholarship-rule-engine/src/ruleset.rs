//! 规则集
//!
//! 将规则 JSON 解析为内存中的有序规则列表。规则集必须是规则对象组成的
//! JSON 数组；语法错误或结构错误在进入引擎之前就被拒绝。

use crate::error::{Result, RuleError};
use crate::models::{Condition, Rule};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// 有序规则集
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ruleset {
    rules: Vec<Rule>,
}

impl Ruleset {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// 从 JSON 字符串解析规则集
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// 从 JSON 值解析规则集
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(RuleError::InvalidRuleset(format!(
                "规则集必须是 JSON 数组，实际为 {}",
                type_name(&value)
            )));
        };

        let mut rules = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            let rule: Rule = serde_json::from_value(item)
                .map_err(|e| RuleError::ParseError(format!("rules[{}]: {}", i, e)))?;
            rules.push(rule);
        }

        Ok(Self { rules })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.rules)?)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// 规则集中引用到的所有事实字段
    pub fn required_fields(&self) -> BTreeSet<String> {
        self.rules
            .iter()
            .flat_map(|rule| rule.conditions.iter())
            .filter_map(Condition::field)
            .map(str::to_string)
            .collect()
    }
}

impl From<Vec<Rule>> for Ruleset {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

impl AsRef<[Rule]> for Ruleset {
    fn as_ref(&self) -> &[Rule] {
        &self.rules
    }
}

impl<'a> IntoIterator for &'a Ruleset {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// 获取值的类型名称
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
