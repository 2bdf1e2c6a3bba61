//! 网关统一错误处理
//!
//! 提供结构化错误类型，区分批次级错误（校验、授权）与单条文本级错误（上游、网络、超时）

use std::fmt;

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// 请求参数无效
    #[error("{0}")]
    InvalidRequest(String),

    /// 缺少可用的授权信息
    #[error("缺少授权信息")]
    Unauthorized,

    /// 上游返回非 200 状态
    #[error("上游返回错误: {status} - {body}")]
    UpstreamError { status: u16, body: String },

    /// 网络错误
    #[error("请求失败: {0}")]
    NetworkError(String),

    /// 超时错误
    #[error("请求超时: {0}")]
    TimeoutError(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerializationError(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl TranslationError {
    /// 该错误是否只影响单条文本（不会中止整个批次）
    pub fn is_unit_failure(&self) -> bool {
        matches!(
            self,
            TranslationError::UpstreamError { .. }
                | TranslationError::NetworkError(_)
                | TranslationError::TimeoutError(_)
                | TranslationError::SerializationError(_)
                | TranslationError::InternalError(_)
        )
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::InvalidRequest(_) => ErrorSeverity::Info,
            TranslationError::Unauthorized => ErrorSeverity::Info,
            TranslationError::UpstreamError { .. } => ErrorSeverity::Warning,
            TranslationError::NetworkError(_) => ErrorSeverity::Warning,
            TranslationError::TimeoutError(_) => ErrorSeverity::Warning,
            TranslationError::SerializationError(_) => ErrorSeverity::Error,
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::InternalError(_) => ErrorSeverity::Critical,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(self, context: T) -> Self {
        match self {
            TranslationError::InvalidRequest(msg) => {
                TranslationError::InvalidRequest(format!("{} ({})", msg, context))
            }
            TranslationError::NetworkError(msg) => {
                TranslationError::NetworkError(format!("{} ({})", msg, context))
            }
            TranslationError::TimeoutError(msg) => {
                TranslationError::TimeoutError(format!("{} ({})", msg, context))
            }
            TranslationError::SerializationError(msg) => {
                TranslationError::SerializationError(format!("{} ({})", msg, context))
            }
            TranslationError::ConfigError(msg) => {
                TranslationError::ConfigError(format!("{} ({})", msg, context))
            }
            TranslationError::InternalError(msg) => {
                TranslationError::InternalError(format!("{} ({})", msg, context))
            }
            other => other,
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::ConfigError(format!("IO错误: {}", error))
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::SerializationError(format!("JSON解析失败: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("解析TOML配置失败: {}", error))
    }
}

impl From<serde_yaml::Error> for TranslationError {
    fn from(error: serde_yaml::Error) -> Self {
        TranslationError::ConfigError(format!("解析YAML配置失败: {}", error))
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::TimeoutError(error.to_string())
        } else if error.is_decode() {
            TranslationError::SerializationError(format!("解析响应失败: {}", error))
        } else {
            TranslationError::NetworkError(error.to_string())
        }
    }
}

impl From<tokio::time::error::Elapsed> for TranslationError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        TranslationError::TimeoutError(format!("异步操作超时: {}", error))
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &TranslationError) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("请求被拒绝: {}", error),
            ErrorSeverity::Warning => tracing::warn!("翻译失败: {}", error),
            ErrorSeverity::Error => tracing::error!("翻译错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("严重错误: {}", error),
        }
    }

    /// 创建输入验证错误
    pub fn validation_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::InvalidRequest(msg.to_string())
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ConfigError(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_failure_classification() {
        assert!(TranslationError::UpstreamError {
            status: 502,
            body: "bad gateway".to_string()
        }
        .is_unit_failure());
        assert!(TranslationError::TimeoutError("30s".to_string()).is_unit_failure());
        assert!(TranslationError::NetworkError("refused".to_string()).is_unit_failure());

        assert!(!TranslationError::InvalidRequest("text 参数是必需的".to_string()).is_unit_failure());
        assert!(!TranslationError::Unauthorized.is_unit_failure());
    }

    #[test]
    fn test_upstream_error_display_includes_status_and_body() {
        let error = TranslationError::UpstreamError {
            status: 429,
            body: "{\"message\":\"too many requests\"}".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("too many requests"));
    }

    #[test]
    fn test_with_context() {
        let error = TranslationError::NetworkError("连接被拒绝".to_string()).with_context("text[3]");
        assert_eq!(error.to_string(), "请求失败: 连接被拒绝 (text[3])");

        // 无消息体的错误保持不变
        assert_eq!(
            TranslationError::Unauthorized.with_context("ignored"),
            TranslationError::Unauthorized
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(TranslationError::ConfigError("x".into()).severity() > ErrorSeverity::Warning);
        assert_eq!(
            TranslationError::InvalidRequest("x".into()).severity(),
            ErrorSeverity::Info
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: TranslationError = json_error.into();
        assert!(matches!(error, TranslationError::SerializationError(_)));
    }
}
