//! 奖学金顾问服务错误类型定义

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rule_engine::RuleError;
use serde_json::json;

/// 顾问服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("参数验证失败: {0}")]
    Validation(String),

    #[error("规则 JSON 格式无效: {0}")]
    InvalidRuleJson(String),

    #[error("读取规则文件失败 {}: {source}", path.display())]
    RulesFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("内部错误: {0}")]
    Internal(String),
}

impl AdvisorError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidRuleJson(_) => StatusCode::BAD_REQUEST,
            Self::RulesFile { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidRuleJson(_) => "INVALID_RULE_JSON",
            Self::RulesFile { .. } => "RULES_FILE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AdvisorError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息记录日志
        let message = match &self {
            Self::RulesFile { path, source } => {
                tracing::error!(path = %path.display(), error = %source, "规则文件读取失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for AdvisorError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 规则集解析失败一律视为调用方提交的规则 JSON 无效
impl From<RuleError> for AdvisorError {
    fn from(err: RuleError) -> Self {
        Self::InvalidRuleJson(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
