//! 决策策略
//!
//! 在规则引擎之上补充兜底逻辑：没有任何规则命中时使用配置的默认决策。

use std::time::Instant;

use rule_engine::{Action, Decision, FactComparison, Facts, RuleSelector, Ruleset};
use scholarship_shared::config::AdvisorConfig;
use scholarship_shared::observability::metrics;
use serde::Serialize;
use tracing::{info, instrument};

/// 一次评估的完整结论
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionReport {
    pub decision: Decision,
    /// 展示用的决策名，如 `AWARD FULL`
    pub label: String,
    pub reason: String,
    pub triggered_rule: Option<String>,
    pub priority: Option<i64>,
    /// 没有规则命中、使用了兜底决策
    pub defaulted: bool,
    pub matched_facts: Vec<FactComparison>,
    pub evaluated_rules: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub evaluation_trace: Vec<String>,
}

/// 奖学金顾问
#[derive(Debug, Clone)]
pub struct Advisor {
    fallback: Action,
}

impl Advisor {
    pub fn new(fallback: Action) -> Self {
        Self { fallback }
    }

    pub fn from_config(config: &AdvisorConfig) -> Self {
        Self::new(Action::new(
            config.fallback_decision.as_str(),
            config.fallback_reason.as_str(),
        ))
    }

    pub fn fallback(&self) -> &Action {
        &self.fallback
    }

    /// 对一组事实做出决策
    #[instrument(skip_all, fields(rules = ruleset.len(), facts = facts.len()))]
    pub fn decide(&self, ruleset: &Ruleset, facts: &Facts, trace: bool) -> DecisionReport {
        let selector = if trace {
            RuleSelector::new().with_trace()
        } else {
            RuleSelector::new()
        };

        let start = Instant::now();
        let selection = selector.select(ruleset.rules(), facts);
        let elapsed = start.elapsed().as_secs_f64();

        let evaluated_rules = selection.evaluated_rules;
        let evaluation_trace = selection.evaluation_trace;

        let report = match selection.matched {
            Some(matched) => DecisionReport {
                label: matched.action.decision.label(),
                decision: matched.action.decision,
                reason: matched.action.reason,
                triggered_rule: Some(matched.rule_name),
                priority: Some(matched.priority),
                defaulted: false,
                matched_facts: matched.matched_facts,
                evaluated_rules,
                evaluation_trace,
            },
            None => DecisionReport {
                label: self.fallback.decision.label(),
                decision: self.fallback.decision.clone(),
                reason: self.fallback.reason.clone(),
                triggered_rule: None,
                priority: None,
                defaulted: true,
                matched_facts: Vec::new(),
                evaluated_rules,
                evaluation_trace,
            },
        };

        metrics::record_decision(report.decision.as_str(), report.defaulted, elapsed);
        info!(
            decision = %report.decision,
            rule = report.triggered_rule.as_deref().unwrap_or("-"),
            defaulted = report.defaulted,
            "奖学金决策完成"
        );

        report
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::from_config(&AdvisorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rule_engine::{ApplicantProfile, Condition, Operator, Rule};

    #[test]
    fn test_match_carries_rule_details() {
        let profile = ApplicantProfile {
            cgpa: 3.8,
            family_income: 6000.0,
            co_curricular_score: 85,
            community_service_hours: 30,
            current_semester: 5,
            disciplinary_actions: 0,
        };

        let report = Advisor::default().decide(&Ruleset::default_rules(), &profile.into(), false);

        assert_eq!(report.decision, Decision::AwardFull);
        assert_eq!(report.label, "AWARD FULL");
        assert_eq!(report.triggered_rule.as_deref(), Some("Top merit candidate"));
        assert_eq!(report.priority, Some(100));
        assert!(!report.defaulted);
        assert_eq!(report.matched_facts.len(), 4);
        assert!(report.evaluation_trace.is_empty());
    }

    #[test]
    fn test_no_match_uses_fallback() {
        let profile = ApplicantProfile {
            cgpa: 3.0,
            family_income: 10000.0,
            co_curricular_score: 40,
            community_service_hours: 10,
            current_semester: 5,
            disciplinary_actions: 0,
        };

        let report = Advisor::default().decide(&Ruleset::default_rules(), &profile.into(), true);

        assert_eq!(report.decision, Decision::Reject);
        assert_eq!(
            report.reason,
            "Applicant does not satisfy any scholarship criteria."
        );
        assert!(report.defaulted);
        assert!(report.triggered_rule.is_none());
        assert!(report.matched_facts.is_empty());
        assert_eq!(report.evaluated_rules, 5);
        assert!(!report.evaluation_trace.is_empty());
    }

    #[test]
    fn test_empty_ruleset_defaults() {
        let report = Advisor::default().decide(&Ruleset::new(Vec::new()), &Facts::new(), false);
        assert!(report.defaulted);
        assert_eq!(report.evaluated_rules, 0);
    }

    #[test]
    fn test_custom_fallback() {
        let advisor = Advisor::new(Action::new("REVIEW", "Manual check required."));
        let ruleset = Ruleset::new(vec![
            Rule::new("never", 1, Action::new("AWARD_FULL", ""))
                .with_condition(Condition::new("cgpa", Operator::Gt, 10)),
        ]);

        let report = advisor.decide(&ruleset, &Facts::new().with("cgpa", 3.0), false);

        assert_eq!(report.decision, Decision::Review);
        assert_eq!(report.reason, "Manual check required.");
        assert!(report.defaulted);
    }
}
