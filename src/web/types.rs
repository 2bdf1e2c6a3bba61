//! Web 模块的数据类型定义

use serde::{Deserialize, Serialize};

use crate::translation::{BatchTranslator, DebugConfig};

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub translator: BatchTranslator,
    pub debug: DebugConfig,
}

impl AppState {
    pub fn new(translator: BatchTranslator) -> Self {
        let debug = translator.debug();
        Self { translator, debug }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
