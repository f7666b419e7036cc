//! 路由配置模块

use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use scholarship_shared::observability::middleware as obs_middleware;
use serde_json::{Value, json};

use crate::{handlers, state::AppState};

/// 构建 API 路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/evaluate", post(handlers::evaluate::evaluate))
        .route(
            "/rules",
            get(handlers::rules::get_rules).put(handlers::rules::replace_rules),
        )
        .route("/rules/reset", post(handlers::rules::reset_rules))
}

/// 构建完整应用：API 路由、健康检查和可观测性中间件
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(health_check))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}

/// 存活探针
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": crate::SERVICE_NAME
    }))
}
