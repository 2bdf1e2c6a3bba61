//! # Translate Gateway
//!
//! 批量翻译网关：接收一次包含多条文本的翻译请求，按条并发调用只支持单条文本的上游服务，
//! 再按原始顺序组装为批量响应。
//!
//! ## 模块组织
//!
//! - `env` - 类型安全的环境变量
//! - `translation` - 配置、错误、上游客户端与批量翻译器
//! - `web` - HTTP 服务（可选）

pub mod env;
pub mod translation;
#[cfg(feature = "web")]
pub mod web;

pub use translation::{
    AggregateStatus, BatchRequest, BatchResponse, BatchTranslator, Credential, GatewayConfig,
    TranslationError, TranslationResult,
};
