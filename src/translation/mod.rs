//! 翻译网关核心
//!
//! - **config**: 配置结构与加载
//! - **error**: 错误类型
//! - **token**: 授权信息提取
//! - **types**: 批量接口与上游接口的数据结构
//! - **upstream**: 单条文本翻译（上游 HTTP 客户端）
//! - **batch**: 批量翻译器，负责并发派发与结果重组
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use translate_gateway::translation::{BatchRequest, BatchTranslator, ConfigManager, Credential};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigManager::new()?.into_config();
//! let translator = BatchTranslator::from_config(&config)?;
//!
//! let request = BatchRequest::new(["Hello", "World"], "ZH");
//! let credential = Credential::from_header("DeepL-Auth-Key your-key");
//! let (response, status) = translator.translate(request, &credential).await?;
//! println!("{} {:?}", status.status_code(), response.translations);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod token;
pub mod types;
pub mod upstream;

pub use batch::{AggregateStatus, BatchTranslator, UnitResult, ERROR_MARKER_PREFIX};
pub use config::{ConfigManager, DebugConfig, GatewayConfig};
pub use error::{ErrorSeverity, TranslationError, TranslationResult};
pub use token::{extract_token, Credential};
pub use types::{BatchRequest, BatchResponse, Translation, UpstreamRequest, UpstreamResponse};
pub use upstream::{TextTranslator, UpstreamCallSpec, UpstreamClient};
