//! Web 路由定义

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::{handlers::*, types::AppState};

/// 创建路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // 批量翻译，保留 /v2/translate 以兼容现有客户端
        .route("/v2/translate", post(translate_batch))
        .route("/translate-batch", post(translate_batch))
        .route("/health", get(health_check))
}
