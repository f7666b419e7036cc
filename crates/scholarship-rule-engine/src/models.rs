//! 规则引擎领域模型

use crate::operators::Operator;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// 十进制数字面量：可选符号，最多一个小数点，至少一位数字
static DECIMAL_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)$").expect("十进制正则必须合法"));

/// 申请人事实字段名
pub mod fields {
    pub const CGPA: &str = "cgpa";
    pub const FAMILY_INCOME: &str = "family_income";
    pub const CO_CURRICULAR_SCORE: &str = "co_curricular_score";
    pub const COMMUNITY_SERVICE_HOURS: &str = "community_service_hours";
    pub const CURRENT_SEMESTER: &str = "current_semester";
    pub const DISCIPLINARY_ACTIONS: &str = "disciplinary_actions";
}

/// 条件字面量
///
/// 规则 JSON 中的值可能是数字，也可能是看起来像数字的字符串，
/// 评估前统一经过 [`Literal::coerce`] 转换。
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl Literal {
    /// 将 JSON 值转换为字面量
    ///
    /// - 数字原样使用
    /// - 字符串先去掉首尾空白，若是十进制数则转换为数字，否则保留文本
    /// - 空字符串、布尔、null、数组、对象无法转换，返回 None
    pub fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                if DECIMAL_LITERAL.is_match(trimmed) {
                    return trimmed.parse().ok().map(Self::Number);
                }
                Some(Self::Text(trimmed.to_string()))
            }
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// 条件：`[field, operator, value]` 三元组
///
/// 反序列化接受任意 JSON 值，不是三元组的条件保存在 `Malformed` 中，
/// 评估时视为不匹配，序列化时原样写回。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Condition {
    Compare {
        field: String,
        operator: String,
        value: Value,
    },
    Malformed(Value),
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self::Compare {
            field: field.into(),
            operator: operator.symbol().to_string(),
            value: value.into(),
        }
    }

    /// 字段名，畸形条件返回 None
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Compare { field, .. } => Some(field),
            Self::Malformed(_) => None,
        }
    }

    /// 已识别的操作符，未知符号或畸形条件返回 None
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Self::Compare { operator, .. } => Operator::from_symbol(operator),
            Self::Malformed(_) => None,
        }
    }

    /// 字段名转为文本：字符串原样，数字和布尔取其文本形式
    fn field_text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl From<Value> for Condition {
    fn from(value: Value) -> Self {
        if let Value::Array(items) = &value {
            if let [field, Value::String(operator), literal] = items.as_slice() {
                if let Some(field) = Self::field_text(field) {
                    return Self::Compare {
                        field,
                        operator: operator.clone(),
                        value: literal.clone(),
                    };
                }
            }
        }
        Self::Malformed(value)
    }
}

impl From<Condition> for Value {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Compare {
                field,
                operator,
                value,
            } => Value::Array(vec![Value::String(field), Value::String(operator), value]),
            Condition::Malformed(raw) => raw,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare {
                field,
                operator,
                value,
            } => write!(f, "{} {} {}", field, operator, value),
            Self::Malformed(raw) => write!(f, "<malformed {}>", raw),
        }
    }
}

/// 决策标签
///
/// 内置四种奖学金决策，其他标签由规则作者自定义，原样保留。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Decision {
    AwardFull,
    AwardPartial,
    Review,
    Reject,
    Other(String),
}

impl Decision {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AwardFull => "AWARD_FULL",
            Self::AwardPartial => "AWARD_PARTIAL",
            Self::Review => "REVIEW",
            Self::Reject => "REJECT",
            Self::Other(tag) => tag,
        }
    }

    /// 展示用标签，下划线替换为空格（`AWARD_FULL` -> `AWARD FULL`）
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl From<String> for Decision {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "AWARD_FULL" => Self::AwardFull,
            "AWARD_PARTIAL" => Self::AwardPartial,
            "REVIEW" => Self::Review,
            "REJECT" => Self::Reject,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for Decision {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<Decision> for String {
    fn from(decision: Decision) -> Self {
        decision.as_str().to_string()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 规则命中后的动作
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub decision: Decision,
    #[serde(default)]
    pub reason: String,
}

impl Action {
    pub fn new(decision: impl Into<Decision>, reason: impl Into<String>) -> Self {
        Self {
            decision: decision.into(),
            reason: reason.into(),
        }
    }
}

/// 规则定义
///
/// `name`、`priority`、`conditions` 缺省时分别为空字符串、0、空列表；
/// `action` 必填。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub action: Action,
}

impl Rule {
    pub fn new(name: impl Into<String>, priority: i64, action: Action) -> Self {
        Self {
            name: name.into(),
            priority,
            conditions: Vec::new(),
            action,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// 申请人事实：字段名 -> 数值
///
/// 每次评估由调用方构造，评估期间只读。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Facts(BTreeMap<String, f64>);

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    /// 构造时追加一个事实（同名覆盖）
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Facts {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// 申请表单中的六项事实
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub cgpa: f64,
    pub family_income: f64,
    pub co_curricular_score: u32,
    pub community_service_hours: u32,
    pub current_semester: u32,
    pub disciplinary_actions: u32,
}

impl Default for ApplicantProfile {
    fn default() -> Self {
        Self {
            cgpa: 3.5,
            family_income: 5000.0,
            co_curricular_score: 70,
            community_service_hours: 50,
            current_semester: 5,
            disciplinary_actions: 0,
        }
    }
}

impl From<&ApplicantProfile> for Facts {
    fn from(profile: &ApplicantProfile) -> Self {
        Facts::new()
            .with(fields::CGPA, profile.cgpa)
            .with(fields::FAMILY_INCOME, profile.family_income)
            .with(
                fields::CO_CURRICULAR_SCORE,
                f64::from(profile.co_curricular_score),
            )
            .with(
                fields::COMMUNITY_SERVICE_HOURS,
                f64::from(profile.community_service_hours),
            )
            .with(fields::CURRENT_SEMESTER, f64::from(profile.current_semester))
            .with(
                fields::DISCIPLINARY_ACTIONS,
                f64::from(profile.disciplinary_actions),
            )
    }
}

impl From<ApplicantProfile> for Facts {
    fn from(profile: ApplicantProfile) -> Self {
        Self::from(&profile)
    }
}

/// 一次数值比较的明细：`field operator threshold`，以及实际的事实值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactComparison {
    pub field: String,
    pub operator: Operator,
    pub threshold: f64,
    pub actual: f64,
}

impl fmt::Display for FactComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} (actual: {})",
            self.field, self.operator, self.threshold, self.actual
        )
    }
}

/// 命中的规则
///
/// 直接携带规则的条件列表和逐条比较明细，调用方无需再根据规则名回查规则。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleMatch {
    pub rule_name: String,
    pub priority: i64,
    pub action: Action,
    pub conditions: Vec<Condition>,
    pub matched_facts: Vec<FactComparison>,
}

/// 规则选择结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionResult {
    /// 第一条完全匹配的规则，没有规则匹配时为 None
    pub matched: Option<RuleMatch>,
    /// 实际评估过的规则数（命中后短路）
    pub evaluated_rules: usize,
    pub evaluation_trace: Vec<String>,
}

impl SelectionResult {
    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }

    pub fn action(&self) -> Option<&Action> {
        self.matched.as_ref().map(|m| &m.action)
    }

    pub fn rule_name(&self) -> Option<&str> {
        self.matched.as_ref().map(|m| m.rule_name.as_str())
    }

    pub fn into_match(self) -> Option<RuleMatch> {
        self.matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_coercion() {
        assert_eq!(Literal::coerce(&json!(3.7)), Some(Literal::Number(3.7)));
        assert_eq!(Literal::coerce(&json!(80)), Some(Literal::Number(80.0)));
        assert_eq!(Literal::coerce(&json!("3.7")), Some(Literal::Number(3.7)));
        assert_eq!(Literal::coerce(&json!("  42 ")), Some(Literal::Number(42.0)));
        assert_eq!(Literal::coerce(&json!("-1.5")), Some(Literal::Number(-1.5)));
        assert_eq!(Literal::coerce(&json!("+2")), Some(Literal::Number(2.0)));
        assert_eq!(Literal::coerce(&json!(".5")), Some(Literal::Number(0.5)));
        assert_eq!(Literal::coerce(&json!("3.")), Some(Literal::Number(3.0)));
    }

    #[test]
    fn test_literal_coercion_keeps_text() {
        assert_eq!(
            Literal::coerce(&json!("abc")),
            Some(Literal::Text("abc".to_string()))
        );
        // 多个小数点、科学计数法、inf 都不是十进制字面量
        assert_eq!(
            Literal::coerce(&json!("1.2.3")),
            Some(Literal::Text("1.2.3".to_string()))
        );
        assert_eq!(
            Literal::coerce(&json!("1e5")),
            Some(Literal::Text("1e5".to_string()))
        );
        assert_eq!(
            Literal::coerce(&json!("inf")),
            Some(Literal::Text("inf".to_string()))
        );
    }

    #[test]
    fn test_literal_coercion_failures() {
        assert_eq!(Literal::coerce(&json!("")), None);
        assert_eq!(Literal::coerce(&json!("   ")), None);
        assert_eq!(Literal::coerce(&json!(null)), None);
        assert_eq!(Literal::coerce(&json!(true)), None);
        assert_eq!(Literal::coerce(&json!([1])), None);
        assert_eq!(Literal::coerce(&json!({"v": 1})), None);
    }

    #[test]
    fn test_condition_from_triple() {
        let cond: Condition = serde_json::from_value(json!(["cgpa", ">=", 3.7])).unwrap();
        assert_eq!(cond, Condition::new("cgpa", Operator::Gte, 3.7));
        assert_eq!(cond.field(), Some("cgpa"));
        assert_eq!(cond.operator(), Some(Operator::Gte));
    }

    #[test]
    fn test_condition_numeric_field_is_coerced_to_text() {
        let cond: Condition = serde_json::from_value(json!([5, "==", 1])).unwrap();
        assert_eq!(cond.field(), Some("5"));
    }

    #[test]
    fn test_condition_malformed_shapes() {
        for raw in [
            json!(["cgpa", ">="]),
            json!(["cgpa", ">=", 3.7, "extra"]),
            json!([]),
            json!("cgpa >= 3.7"),
            json!({"field": "cgpa"}),
            json!(["cgpa", 1, 3.7]),
            json!([null, ">=", 3.7]),
        ] {
            let cond: Condition = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(cond, Condition::Malformed(raw));
            assert_eq!(cond.field(), None);
        }
    }

    #[test]
    fn test_condition_unknown_operator_is_kept() {
        let cond: Condition = serde_json::from_value(json!(["cgpa", "=>", 3.7])).unwrap();
        assert_eq!(cond.field(), Some("cgpa"));
        assert_eq!(cond.operator(), None);

        // 写回时保留原始符号
        assert_eq!(serde_json::to_value(&cond).unwrap(), json!(["cgpa", "=>", 3.7]));
    }

    #[test]
    fn test_decision_tags() {
        let action: Action =
            serde_json::from_value(json!({"decision": "AWARD_FULL", "reason": "r"})).unwrap();
        assert_eq!(action.decision, Decision::AwardFull);
        assert_eq!(action.decision.label(), "AWARD FULL");

        let custom: Decision = serde_json::from_value(json!("WAITLIST")).unwrap();
        assert_eq!(custom, Decision::Other("WAITLIST".to_string()));
        assert_eq!(serde_json::to_value(&custom).unwrap(), json!("WAITLIST"));
    }

    #[test]
    fn test_rule_defaults() {
        let rule: Rule = serde_json::from_value(json!({
            "action": {"decision": "REVIEW", "reason": "catch-all"}
        }))
        .unwrap();

        assert_eq!(rule.name, "");
        assert_eq!(rule.priority, 0);
        assert!(rule.conditions.is_empty());
    }

    #[test]
    fn test_rule_requires_action() {
        let result = serde_json::from_value::<Rule>(json!({
            "name": "no action",
            "priority": 10,
            "conditions": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_applicant_profile_into_facts() {
        let facts = Facts::from(ApplicantProfile::default());

        assert_eq!(facts.len(), 6);
        assert_eq!(facts.get(fields::CGPA), Some(3.5));
        assert_eq!(facts.get(fields::FAMILY_INCOME), Some(5000.0));
        assert_eq!(facts.get(fields::CURRENT_SEMESTER), Some(5.0));
        assert_eq!(facts.get(fields::DISCIPLINARY_ACTIONS), Some(0.0));
        assert_eq!(facts.get("unknown"), None);
    }

    #[test]
    fn test_facts_from_json() {
        let facts: Facts = serde_json::from_value(json!({"cgpa": 3.8, "family_income": 5000})).unwrap();
        assert_eq!(facts.get("cgpa"), Some(3.8));
        assert_eq!(facts.get("family_income"), Some(5000.0));

        assert!(serde_json::from_value::<Facts>(json!({"cgpa": "high"})).is_err());
    }
}
