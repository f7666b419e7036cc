//! 评估 API 处理器

use axum::{Json, extract::State};

use crate::{
    advisor::DecisionReport,
    dto::{ApiResponse, EvaluateRequest},
    error::Result,
    state::AppState,
};

/// 评估一份申请
///
/// POST /api/evaluate
pub async fn evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<ApiResponse<DecisionReport>>> {
    let facts = req.build_facts()?;

    let report = match req.inline_rules()? {
        Some(ruleset) => state.advisor.decide(&ruleset, &facts, req.trace),
        None => state
            .advisor
            .decide(&state.rule_book.current(), &facts, req.trace),
    };

    Ok(Json(ApiResponse::success(report)))
}
