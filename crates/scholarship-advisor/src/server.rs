//! HTTP 服务启动

use std::path::Path;
use std::time::Duration;

use axum::http::HeaderValue;
use scholarship_shared::config::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::advisor::Advisor;
use crate::routes;
use crate::rules::{RuleBook, RulesFileWatcher};
use crate::state::AppState;

/// 启动 HTTP 服务，直到收到关闭信号
pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let rule_book = RuleBook::load(config.advisor.rules_path.as_deref().map(Path::new))?;

    // 监听器随本函数返回而 drop，停止监听
    let _watcher = if config.advisor.watch_rules && rule_book.source().is_some() {
        let debounce = Duration::from_millis(config.advisor.reload_debounce_ms);
        match RulesFileWatcher::start(rule_book.clone(), debounce) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!(error = %e, "规则文件监听启动失败，热加载不可用");
                None
            }
        }
    } else {
        None
    };

    let advisor = Advisor::from_config(&config.advisor);
    info!(
        rules = rule_book.current().len(),
        fallback = %advisor.fallback().decision,
        "规则集就绪"
    );

    let app = routes::app(AppState::new(rule_book, advisor))
        .layer(cors_layer(&config.server.cors_origins, config.is_production()));

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// 构建 CORS 层
fn cors_layer(allowed_origins: &str, production: bool) -> CorsLayer {
    if allowed_origins.trim() == "*" {
        if production {
            warn!("cors_origins=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();
    info!(origins = allowed_origins, "CORS allowed origins");

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 监听关闭信号
///
/// 收到 SIGTERM 或 Ctrl+C 后返回，触发 axum 的优雅关闭流程。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "注册 Ctrl+C 处理器失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "注册 SIGTERM 处理器失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
