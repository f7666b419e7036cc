//! CLI 模块
//!
//! - `serve` - 启动 HTTP 服务
//! - `evaluate` - 对一份申请做一次性评估
//! - `rules` - 打印当前生效的规则集
//!
//! # 使用示例
//!
//! ```bash
//! scholarship-advisor serve --port 8080 --rules config/rules.json
//! scholarship-advisor evaluate --cgpa 3.8 --co-curricular-score 85 --family-income 6000
//! scholarship-advisor evaluate --cgpa 2.0 --trace --json
//! scholarship-advisor rules --rules config/rules.json
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands, EvaluateArgs};
pub use runner::{render_report, run_evaluate, run_rules};
