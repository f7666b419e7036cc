//! CLI 命令定义

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rule_engine::Facts;

use crate::dto::{ApplicantRequest, EvaluateRequest};

/// 奖学金顾问命令行工具
#[derive(Parser, Debug)]
#[command(name = "scholarship-advisor")]
#[command(version, about = "基于规则的奖学金评估工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，RUST_LOG 优先
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 启动 HTTP 服务
    Serve {
        /// 服务端口，覆盖配置文件
        #[arg(short, long)]
        port: Option<u16>,

        /// 规则文件，覆盖配置文件
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// 评估一份申请并打印决策
    Evaluate(EvaluateArgs),

    /// 打印当前生效的规则集
    Rules {
        /// 规则文件，默认使用配置文件中的路径或内置默认规则
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

/// `evaluate` 子命令参数，默认值与申请表单一致
#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[arg(long, default_value_t = 3.5)]
    pub cgpa: f64,

    #[arg(long, default_value_t = 5000.0)]
    pub family_income: f64,

    #[arg(long, default_value_t = 70)]
    pub co_curricular_score: u32,

    #[arg(long, default_value_t = 50)]
    pub community_service_hours: u32,

    #[arg(long, default_value_t = 5)]
    pub current_semester: u32,

    #[arg(long, default_value_t = 0)]
    pub disciplinary_actions: u32,

    /// 额外事实，可重复，如 `--fact research_papers=2`
    #[arg(long = "fact", value_name = "NAME=VALUE", value_parser = parse_fact)]
    pub facts: Vec<(String, f64)>,

    /// 规则文件
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// 打印逐条规则的评估追踪
    #[arg(long)]
    pub trace: bool,

    /// 以 JSON 输出
    #[arg(long)]
    pub json: bool,
}

impl EvaluateArgs {
    pub fn to_request(&self) -> EvaluateRequest {
        let facts = (!self.facts.is_empty())
            .then(|| self.facts.iter().map(|(k, v)| (k.as_str(), *v)).collect::<Facts>());

        EvaluateRequest {
            applicant: Some(ApplicantRequest {
                cgpa: self.cgpa,
                family_income: self.family_income,
                co_curricular_score: self.co_curricular_score,
                community_service_hours: self.community_service_hours,
                current_semester: self.current_semester,
                disciplinary_actions: self.disciplinary_actions,
            }),
            facts,
            rules: None,
            trace: self.trace,
        }
    }
}

fn parse_fact(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("事实格式应为 NAME=VALUE: {s}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("事实名不能为空: {s}"));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("事实值必须是数字: {s} ({e})"))?;
    Ok((name.to_string(), value))
}
