//! 应用状态定义

use std::sync::Arc;

use crate::advisor::Advisor;
use crate::rules::RuleBook;

/// Axum 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub rule_book: RuleBook,
    pub advisor: Arc<Advisor>,
}

impl AppState {
    pub fn new(rule_book: RuleBook, advisor: Advisor) -> Self {
        Self {
            rule_book,
            advisor: Arc::new(advisor),
        }
    }
}
