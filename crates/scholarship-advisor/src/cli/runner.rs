//! 命令执行器

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;
use scholarship_shared::config::AppConfig;

use crate::advisor::{Advisor, DecisionReport};
use crate::cli::EvaluateArgs;
use crate::rules::RuleBook;

/// 命令行指定的规则文件优先，其次配置文件中的路径，最后内置默认规则
fn load_rule_book(rules: Option<&Path>, config: &AppConfig) -> Result<RuleBook> {
    let configured = config.advisor.rules_path.as_deref().map(PathBuf::from);
    let path = rules.map(Path::to_path_buf).or(configured);
    Ok(RuleBook::load(path.as_deref())?)
}

/// 执行 evaluate 命令
pub fn run_evaluate(args: &EvaluateArgs, config: &AppConfig) -> Result<()> {
    let request = args.to_request();
    let facts = request.build_facts()?;
    let rule_book = load_rule_book(args.rules.as_deref(), config)?;

    let report = Advisor::from_config(&config.advisor).decide(&rule_book.current(), &facts, args.trace);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

/// 执行 rules 命令
pub fn run_rules(rules: Option<&Path>, config: &AppConfig) -> Result<()> {
    let rule_book = load_rule_book(rules, config)?;
    println!("{}", rule_book.current().to_json_pretty()?);
    Ok(())
}

/// 渲染人类可读的决策结果
pub fn render_report(report: &DecisionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Decision: {}", report.label);

    match (&report.triggered_rule, report.priority) {
        (Some(rule), Some(priority)) => {
            let _ = writeln!(out, "Rule Triggered: {rule} (priority {priority})");
        }
        (Some(rule), None) => {
            let _ = writeln!(out, "Rule Triggered: {rule}");
        }
        (None, _) => {
            let _ = writeln!(out, "Rule Triggered: none (default decision)");
        }
    }

    let _ = writeln!(out, "Reason: {}", report.reason);

    if !report.matched_facts.is_empty() {
        let _ = writeln!(out, "Matching Facts:");
        for fact in &report.matched_facts {
            let _ = writeln!(
                out,
                "  - {} {} {}: ✓ (actual: {})",
                fact.field, fact.operator, fact.threshold, fact.actual
            );
        }
    }

    if !report.evaluation_trace.is_empty() {
        let _ = writeln!(out, "Evaluation Trace:");
        for line in &report.evaluation_trace {
            let _ = writeln!(out, "  {line}");
        }
    }

    out
}
