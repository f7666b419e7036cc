//! 奖学金顾问入口

use clap::Parser;
use scholarship_advisor::{
    SERVICE_NAME,
    cli::{Cli, Commands, run_evaluate, run_rules},
    server,
};
use scholarship_shared::{config::AppConfig, observability};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(SERVICE_NAME).unwrap_or_default();
    let obs_config = config.observability.clone().with_service_name(SERVICE_NAME);

    match cli.command {
        Commands::Serve { port, rules } => {
            let obs_config = match &cli.log_level {
                Some(level) => obs_config.with_log_level(level),
                None => obs_config,
            };
            let _guard = observability::init(&obs_config).await?;

            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(rules) = rules {
                config.advisor.rules_path = Some(rules.display().to_string());
            }

            server::serve(&config).await
        }
        // 一次性命令默认只输出警告日志，避免干扰标准输出
        Commands::Evaluate(args) => {
            let level = cli.log_level.as_deref().unwrap_or("warn");
            observability::tracing::init(&obs_config.with_log_level(level))?;
            run_evaluate(&args, &config)
        }
        Commands::Rules { rules } => {
            let level = cli.log_level.as_deref().unwrap_or("warn");
            observability::tracing::init(&obs_config.with_log_level(level))?;
            run_rules(rules.as_deref(), &config)
        }
    }
}
