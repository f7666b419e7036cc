//! 奖学金顾问服务
//!
//! 在规则引擎之上提供兜底决策、规则集热加载、REST API 和命令行入口。

pub mod advisor;
pub mod cli;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod rules;
pub mod server;
pub mod state;

pub use advisor::{Advisor, DecisionReport};
pub use error::{AdvisorError, Result};
pub use rules::{RuleBook, RulesFileWatcher};
pub use state::AppState;

/// 服务名，用于配置文件、日志和指标
pub const SERVICE_NAME: &str = "scholarship-advisor";
