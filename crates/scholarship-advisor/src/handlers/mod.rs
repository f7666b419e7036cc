//! API 处理器

pub mod evaluate;
pub mod rules;
