//! 批量翻译器
//!
//! 将一个批量请求拆分为逐条的上游调用：信号量限制并发，每条调用独立超时，
//! 结果按输入下标重新组装，单条失败只影响自己的位置

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::Instrument;

use crate::translation::config::{DebugConfig, GatewayConfig};
use crate::translation::error::{
    helpers::{log_error, validation_error},
    TranslationError, TranslationResult,
};
use crate::translation::token::Credential;
use crate::translation::types::{BatchRequest, BatchResponse, Translation};
use crate::translation::upstream::{TextTranslator, UpstreamCallSpec, UpstreamClient};

/// 失败条目文本的前缀
pub const ERROR_MARKER_PREFIX: &str = "[TRANSLATION ERROR: ";

/// 单个位置的翻译结果
#[derive(Debug, Clone, PartialEq)]
pub enum UnitResult {
    Success(Translation),
    Failure(TranslationError),
}

impl UnitResult {
    pub fn is_success(&self) -> bool {
        matches!(self, UnitResult::Success(_))
    }

    /// 失败条目以错误标记文本输出，检测语言回填为生效的源语言
    pub fn into_translation(self, source_lang: &str) -> Translation {
        match self {
            UnitResult::Success(translation) => translation,
            UnitResult::Failure(error) => Translation {
                detected_source_language: source_lang.to_string(),
                text: format!("{}{}]", ERROR_MARKER_PREFIX, error),
            },
        }
    }
}

/// 批次整体状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateStatus {
    /// 全部成功
    Complete,
    /// 至少一条失败
    Partial { failed: usize },
}

impl AggregateStatus {
    pub fn from_results(results: &[UnitResult]) -> Self {
        let failed = results.iter().filter(|r| !r.is_success()).count();
        if failed == 0 {
            AggregateStatus::Complete
        } else {
            AggregateStatus::Partial { failed }
        }
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            AggregateStatus::Complete => 200,
            AggregateStatus::Partial { .. } => 206,
        }
    }
}

/// 批量翻译器
///
/// 构造时固定配置，之后可在多个请求间共享（`Clone` 只复制 `Arc`）
#[derive(Clone)]
pub struct BatchTranslator {
    translator: Arc<dyn TextTranslator>,
    base_url: String,
    default_source_lang: String,
    max_concurrent_requests: usize,
    request_timeout: Duration,
    debug: DebugConfig,
}

impl BatchTranslator {
    pub fn new(config: &GatewayConfig, translator: Arc<dyn TextTranslator>) -> Self {
        Self {
            translator,
            base_url: config.target.base_url.clone(),
            default_source_lang: config.target.default_source_lang.clone(),
            max_concurrent_requests: config
                .performance
                .max_concurrent_requests
                .clamp(1, Semaphore::MAX_PERMITS),
            request_timeout: config.performance.request_timeout(),
            debug: config.debug,
        }
    }

    /// 使用 HTTP 上游客户端创建
    pub fn from_config(config: &GatewayConfig) -> TranslationResult<Self> {
        let client = UpstreamClient::new(config.debug)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn debug(&self) -> DebugConfig {
        self.debug
    }

    /// 翻译整个批次
    ///
    /// 校验失败直接返回错误且不发出任何上游调用；否则总是返回与输入等长的结果
    pub async fn translate(
        &self,
        request: BatchRequest,
        credential: &Credential,
    ) -> TranslationResult<(BatchResponse, AggregateStatus)> {
        let request_id = new_request_id();
        let span = tracing::info_span!("batch", request_id = %request_id);
        self.translate_inner(request, credential, request_id)
            .instrument(span)
            .await
    }

    async fn translate_inner(
        &self,
        request: BatchRequest,
        credential: &Credential,
        request_id: String,
    ) -> TranslationResult<(BatchResponse, AggregateStatus)> {
        validate(&request, credential)?;

        let source_lang = match request.source_lang.as_deref() {
            Some(lang) if !lang.is_empty() => lang.to_string(),
            _ => self.default_source_lang.clone(),
        };

        let spec = Arc::new(UpstreamCallSpec::new(
            &self.base_url,
            credential,
            &source_lang,
            &request.target_lang,
            self.request_timeout,
        ));

        let total = request.text.len();
        tracing::info!(
            "批量翻译开始: {} 条文本, {} -> {}",
            total,
            source_lang,
            request.target_lang
        );
        if self.debug.headers() {
            tracing::debug!("上游地址: {}", spec.url);
        }

        let started = Instant::now();
        let results = self.fan_out(request.text, spec, &request_id).await;
        let status = AggregateStatus::from_results(&results);

        let translations = results
            .into_iter()
            .map(|result| result.into_translation(&source_lang))
            .collect();

        match status {
            AggregateStatus::Complete => {
                tracing::info!("批量翻译完成: {} 条, 耗时 {:?}", total, started.elapsed())
            }
            AggregateStatus::Partial { failed } => tracing::warn!(
                "批量翻译部分失败: {}/{} 条失败, 耗时 {:?}",
                failed,
                total,
                started.elapsed()
            ),
        }

        Ok((BatchResponse { translations }, status))
    }

    /// 每条文本一个任务，结果顺序与输入一致
    async fn fan_out(
        &self,
        texts: Vec<String>,
        spec: Arc<UpstreamCallSpec>,
        request_id: &str,
    ) -> Vec<UnitResult> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_requests));

        let handles: Vec<_> = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let semaphore = Arc::clone(&semaphore);
                let translator = Arc::clone(&self.translator);
                let spec = Arc::clone(&spec);
                let span = tracing::debug_span!("unit", id = %format!("{}-{}", request_id, index));

                tokio::spawn(
                    async move {
                        let _permit = semaphore.acquire_owned().await.map_err(|e| {
                            TranslationError::InternalError(format!("获取并发许可失败: {}", e))
                        })?;

                        let started = Instant::now();
                        let result = timeout(spec.timeout, translator.translate_one(&text, &spec))
                            .await
                            .map_err(|_| {
                                TranslationError::TimeoutError(format!(
                                    "超过 {} 秒未响应",
                                    spec.timeout.as_secs_f32()
                                ))
                            })?;
                        tracing::debug!("上游调用结束, 耗时 {:?}", started.elapsed());
                        result
                    }
                    .instrument(span),
                )
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .enumerate()
            .map(|(index, joined)| {
                let outcome = joined.unwrap_or_else(|e| {
                    Err(TranslationError::InternalError(format!("任务异常退出: {}", e)))
                });
                match outcome {
                    Ok(translation) => UnitResult::Success(translation),
                    Err(error) => {
                        let error = error.with_context(format!("text[{}]", index));
                        log_error(&error);
                        UnitResult::Failure(error)
                    }
                }
            })
            .collect()
    }
}

/// 批次校验，顺序固定：text、text[i]、target_lang、授权
fn validate(request: &BatchRequest, credential: &Credential) -> TranslationResult<()> {
    if request.text.is_empty() {
        return Err(validation_error("text 参数是必需的"));
    }

    if let Some(index) = request.text.iter().position(|t| t.is_empty()) {
        return Err(validation_error(format!("text[{}] 不能为空", index)));
    }

    if request.target_lang.is_empty() {
        return Err(validation_error("target_lang 参数是必需的"));
    }

    if credential.is_empty() {
        return Err(TranslationError::Unauthorized);
    }

    Ok(())
}

fn new_request_id() -> String {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default()
        .to_string()
}
