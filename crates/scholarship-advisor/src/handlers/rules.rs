//! 规则集 API 处理器
//!
//! 查看、整体替换、恢复默认规则集。替换只影响内存中的规则集，不回写规则文件。

use axum::{Json, extract::State};
use rule_engine::Ruleset;
use scholarship_shared::observability::metrics;
use tracing::info;

use crate::{
    dto::{ApiResponse, RulesetDto},
    error::Result,
    state::AppState,
};

fn snapshot(state: &AppState) -> RulesetDto {
    let source = state
        .rule_book
        .source()
        .map(|path| path.display().to_string());
    RulesetDto::new(&state.rule_book.current(), source)
}

/// 获取当前规则集
///
/// GET /api/rules
pub async fn get_rules(State(state): State<AppState>) -> Json<ApiResponse<RulesetDto>> {
    Json(ApiResponse::success(snapshot(&state)))
}

/// 替换规则集
///
/// PUT /api/rules，请求体为规则 JSON 原文
pub async fn replace_rules(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ApiResponse<RulesetDto>>> {
    let ruleset = Ruleset::from_json(&body).inspect_err(|_| {
        metrics::record_ruleset_reload("api", "failure");
    })?;

    info!(rules = ruleset.len(), "规则集已通过 API 替换");
    state.rule_book.replace(ruleset);
    metrics::record_ruleset_reload("api", "success");

    Ok(Json(ApiResponse::success_with_message(
        snapshot(&state),
        "规则集已更新",
    )))
}

/// 恢复内置默认规则
///
/// POST /api/rules/reset
pub async fn reset_rules(State(state): State<AppState>) -> Json<ApiResponse<RulesetDto>> {
    state.rule_book.reset_to_defaults();
    info!("规则集已恢复为默认规则");
    metrics::record_ruleset_reload("reset", "success");

    Json(ApiResponse::success_with_message(
        snapshot(&state),
        "已恢复默认规则",
    ))
}
